use askama::Template;

use crate::handlers::helpers::TemplateGlobals;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub globals: TemplateGlobals,
    pub error: Option<String>,
}
