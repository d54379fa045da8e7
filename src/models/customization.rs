use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_SESSION_TIMEOUT_MINUTES;

/// Base map layer shown on the public page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    #[default]
    Traditional,
    Satellite,
}

impl MapType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapType::Traditional => "traditional",
            MapType::Satellite => "satellite",
        }
    }

    pub fn parse(s: &str) -> Option<MapType> {
        match s.trim() {
            "traditional" => Some(MapType::Traditional),
            "satellite" => Some(MapType::Satellite),
            _ => None,
        }
    }
}

/// MySQL connection settings kept for the admin panel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u32,
    pub database: String,
    pub user: String,
    pub password: String,
    pub ssl: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            host: "localhost".into(),
            port: 3306,
            database: "drone_network".into(),
            user: "root".into(),
            password: String::new(),
            ssl: false,
        }
    }
}

impl DatabaseSettings {
    /// Every problem with the settings; empty when they look usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.host.trim().is_empty() {
            errors.push("Host é obrigatório".to_string());
        }
        if !(1..=65535).contains(&self.port) {
            errors.push("Porta deve estar entre 1 e 65535".to_string());
        }
        if self.user.trim().is_empty() {
            errors.push("Usuário é obrigatório".to_string());
        }
        if self.database.trim().is_empty() {
            errors.push("Nome do banco de dados é obrigatório".to_string());
        }
        errors
    }

    /// No driver is linked; a connection "succeeds" when the settings validate.
    pub fn test_connection(&self) -> Result<String, String> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(format!(
                "Configuração válida para {}@{}:{}/{} (modo de demonstração)",
                self.user, self.host, self.port, self.database
            ))
        } else {
            Err(format!("Erro de configuração: {}", errors.join(", ")))
        }
    }
}

/// Branding, contact and map options editable from the admin panel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customization {
    pub logo: String,
    pub home_title: String,
    pub home_subtitle: String,
    pub search_placeholder: String,
    pub search_button: String,
    pub select_state_label: String,
    pub select_city_label: String,
    pub whatsapp_number: String,
    pub whatsapp_message: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub map_type: MapType,
    pub show_coverage_circles: bool,
    pub session_timeout_minutes: u32,
    pub database: DatabaseSettings,
}

impl Default for Customization {
    fn default() -> Self {
        Customization {
            logo: "/static/logo.svg".into(),
            home_title: "Localizador de Unidades".into(),
            home_subtitle: "Encontre nossa unidade mais próxima".into(),
            search_placeholder: "Buscar por nome ou cidade".into(),
            search_button: "Buscar Unidades".into(),
            select_state_label: "Selecione o estado".into(),
            select_city_label: "Todas as cidades".into(),
            whatsapp_number: String::new(),
            whatsapp_message: "Olá! Gostaria de mais informações.".into(),
            contact_email: String::new(),
            contact_phone: String::new(),
            map_type: MapType::Traditional,
            show_coverage_circles: false,
            session_timeout_minutes: DEFAULT_SESSION_TIMEOUT_MINUTES,
            database: DatabaseSettings::default(),
        }
    }
}

impl Customization {
    /// Link opening a WhatsApp chat, when a number is configured.
    pub fn whatsapp_link(&self) -> Option<String> {
        let digits: String = self.whatsapp_number.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return None;
        }
        Some(format!(
            "https://wa.me/{}?text={}",
            digits,
            urlencoding::encode(&self.whatsapp_message)
        ))
    }
}
