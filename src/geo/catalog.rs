//! Embedded reference data: the city catalog used for coverage tests and the
//! list of Brazilian states (UFs).

use super::distance::Position;

/// A named city with a fixed position. Entries are unique by (name, state).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityReference {
    pub name: &'static str,
    pub state: &'static str,
    pub position: Position,
}

/// A Brazilian federative unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateInfo {
    pub uf: &'static str,
    pub name: &'static str,
}

const fn city(name: &'static str, state: &'static str, lat: f64, lng: f64) -> CityReference {
    CityReference {
        name,
        state,
        position: Position::new(lat, lng),
    }
}

pub static CITY_CATALOG: &[CityReference] = &[
    // São Paulo
    city("São Paulo", "SP", -23.5505, -46.6333),
    city("Guarulhos", "SP", -23.4628, -46.5323),
    city("Campinas", "SP", -22.9099, -47.0626),
    city("São Bernardo do Campo", "SP", -23.6914, -46.5646),
    city("Santo André", "SP", -23.6539, -46.5311),
    city("Osasco", "SP", -23.5320, -46.7916),
    city("São José dos Campos", "SP", -23.2237, -45.9009),
    city("Ribeirão Preto", "SP", -21.1775, -47.8103),
    city("Sorocaba", "SP", -23.5015, -47.4526),
    city("Santos", "SP", -23.9608, -46.3331),
    city("Monte Azul Paulista", "SP", -20.9467, -49.2958),
    city("Bauru", "SP", -22.3147, -49.0608),
    city("Piracicaba", "SP", -22.7253, -47.6492),
    city("Jundiaí", "SP", -23.1864, -46.8842),
    city("Franca", "SP", -20.5386, -47.4006),
    city("São José do Rio Preto", "SP", -20.8197, -49.3794),
    city("Araraquara", "SP", -21.7947, -48.1756),
    city("São Carlos", "SP", -22.0175, -47.8908),
    city("Marília", "SP", -22.2139, -49.9456),
    city("Presidente Prudente", "SP", -22.1256, -51.3889),
    // Minas Gerais
    city("Belo Horizonte", "MG", -19.9191, -43.9386),
    city("Uberlândia", "MG", -18.9113, -48.2622),
    city("Contagem", "MG", -19.9320, -44.0537),
    city("Juiz de Fora", "MG", -21.7624, -43.3504),
    city("Betim", "MG", -19.9681, -44.1987),
    city("Montes Claros", "MG", -16.7282, -43.8647),
    city("Uberaba", "MG", -19.7482, -47.9319),
    city("Governador Valadares", "MG", -18.8512, -41.9495),
    city("Ipatinga", "MG", -19.4682, -42.5369),
    city("Sete Lagoas", "MG", -19.4662, -44.2470),
    city("Divinópolis", "MG", -20.1394, -44.8839),
    city("Santa Luzia", "MG", -19.7698, -43.8514),
    city("Ibirité", "MG", -20.0218, -44.0592),
    city("Poços de Caldas", "MG", -21.7895, -46.5617),
    city("Patos de Minas", "MG", -18.5833, -46.5167),
    city("Teófilo Otoni", "MG", -17.8574, -41.5075),
    city("Barbacena", "MG", -21.2258, -43.7736),
    city("Sabará", "MG", -19.8838, -43.8057),
    city("Varginha", "MG", -21.5520, -45.4308),
    city("Pouso Alegre", "MG", -22.2300, -45.9364),
    city("Conselheiro Lafaiete", "MG", -20.6598, -43.7858),
    city("Itabira", "MG", -19.6198, -43.2269),
    city("Araguari", "MG", -18.6486, -48.1836),
    city("Passos", "MG", -20.7191, -46.6097),
    city("Coronel Fabriciano", "MG", -19.5199, -42.6288),
    city("Muriaé", "MG", -21.1305, -42.3666),
    city("Ituiutaba", "MG", -18.9682, -49.4647),
    city("Lavras", "MG", -21.2500, -45.0000),
    city("Pará de Minas", "MG", -19.8604, -44.6081),
    city("Itajubá", "MG", -22.4206, -45.4528),
    city("Paracatu", "MG", -17.2221, -46.8747),
    city("Janaúba", "MG", -15.8000, -43.3167),
    city("Unaí", "MG", -16.3667, -46.9000),
    city("Espera Feliz", "MG", -20.6500, -41.9167),
    city("Boa Esperança", "MG", -21.0953, -45.5653),
    city("Três Corações", "MG", -21.6889, -45.2528),
    city("São João del Rei", "MG", -21.1364, -44.2606),
    city("Leopoldina", "MG", -21.5306, -42.6431),
    city("João Monlevade", "MG", -19.8097, -43.1719),
    // Neighbouring states and capitals
    city("Rio de Janeiro", "RJ", -22.9068, -43.1729),
    city("Brasília", "DF", -15.8267, -47.9218),
    city("Goiânia", "GO", -16.6799, -49.2550),
    city("Campo Grande", "MS", -20.4697, -54.6201),
    city("Vitória", "ES", -20.2976, -40.2958),
    city("Salvador", "BA", -12.9714, -38.5014),
    city("Fortaleza", "CE", -3.7319, -38.5267),
    city("Manaus", "AM", -3.1190, -60.0217),
    city("Curitiba", "PR", -25.4284, -49.2733),
    city("Recife", "PE", -8.0476, -34.8770),
    city("Porto Alegre", "RS", -30.0346, -51.2177),
    city("Belém", "PA", -1.4558, -48.5044),
];

pub static BRAZILIAN_STATES: &[StateInfo] = &[
    StateInfo { uf: "AC", name: "Acre" },
    StateInfo { uf: "AL", name: "Alagoas" },
    StateInfo { uf: "AP", name: "Amapá" },
    StateInfo { uf: "AM", name: "Amazonas" },
    StateInfo { uf: "BA", name: "Bahia" },
    StateInfo { uf: "CE", name: "Ceará" },
    StateInfo { uf: "DF", name: "Distrito Federal" },
    StateInfo { uf: "ES", name: "Espírito Santo" },
    StateInfo { uf: "GO", name: "Goiás" },
    StateInfo { uf: "MA", name: "Maranhão" },
    StateInfo { uf: "MT", name: "Mato Grosso" },
    StateInfo { uf: "MS", name: "Mato Grosso do Sul" },
    StateInfo { uf: "MG", name: "Minas Gerais" },
    StateInfo { uf: "PA", name: "Pará" },
    StateInfo { uf: "PB", name: "Paraíba" },
    StateInfo { uf: "PR", name: "Paraná" },
    StateInfo { uf: "PE", name: "Pernambuco" },
    StateInfo { uf: "PI", name: "Piauí" },
    StateInfo { uf: "RJ", name: "Rio de Janeiro" },
    StateInfo { uf: "RN", name: "Rio Grande do Norte" },
    StateInfo { uf: "RS", name: "Rio Grande do Sul" },
    StateInfo { uf: "RO", name: "Rondônia" },
    StateInfo { uf: "RR", name: "Roraima" },
    StateInfo { uf: "SC", name: "Santa Catarina" },
    StateInfo { uf: "SP", name: "São Paulo" },
    StateInfo { uf: "SE", name: "Sergipe" },
    StateInfo { uf: "TO", name: "Tocantins" },
];

/// Lowercases and strips Portuguese diacritics so "Janaúba" and "janauba"
/// compare equal.
pub fn fold(s: &str) -> String {
    s.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

pub fn find_city(name: &str, state: &str) -> Option<&'static CityReference> {
    let name = fold(name);
    CITY_CATALOG
        .iter()
        .find(|c| fold(c.name) == name && c.state.eq_ignore_ascii_case(state.trim()))
}

pub fn cities_in_state(state: &str) -> impl Iterator<Item = &'static CityReference> + '_ {
    CITY_CATALOG
        .iter()
        .filter(move |c| c.state.eq_ignore_ascii_case(state.trim()))
}

/// Resolves either a UF code ("MG") or a full state name ("Minas Gerais",
/// accents optional) to its state entry.
pub fn resolve_state(token: &str) -> Option<&'static StateInfo> {
    let t = token.trim();
    if t.is_empty() {
        return None;
    }
    let folded = fold(t);
    BRAZILIAN_STATES
        .iter()
        .find(|s| s.uf.eq_ignore_ascii_case(t) || fold(s.name) == folded)
}
