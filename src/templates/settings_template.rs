use askama::Template;

use crate::handlers::helpers::TemplateGlobals;

#[derive(Template)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    pub globals: TemplateGlobals,
    pub error: Option<String>,
}
