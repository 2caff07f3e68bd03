use minijinja::Environment;
use serde::Serialize;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("logout.html", include_str!("../templates/logout.html")),
    ("not_found.html", include_str!("../templates/not_found.html")),
];

/// The page templates, compiled into the binary
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Loads the page templates
    ///
    /// Fails if any template does not parse.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Renders the template `name` with `ctx`
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}

#[cfg(test)]
mod tests {
    use minijinja::context;

    use super::*;
    use crate::pages::{LoginQuery, LoginState, LogoutDelays, LogoutState, NotFound};

    #[test]
    fn all_templates_parse() {
        Templates::new().unwrap();
    }

    #[test]
    fn layout_carries_the_site_title() {
        let templates = Templates::new().unwrap();

        let html = templates
            .render("not_found.html", context! { page => NotFound::new() })
            .unwrap();

        assert!(html.contains("Appwrite OAuth POC | Complete Authentication Example"));
        assert!(html.contains(r#"href="/""#));
    }

    #[test]
    fn login_failure_notice_is_conditional() {
        let templates = Templates::new().unwrap();
        let failed = LoginState::from_query(&LoginQuery {
            error: Some("1".to_owned()),
        });

        let with_notice = templates
            .render("login.html", context! { page => failed.view() })
            .unwrap();
        let without_notice = templates
            .render("login.html", context! { page => LoginState::default().view() })
            .unwrap();

        assert!(with_notice.contains("Sign-in failed"));
        assert!(!without_notice.contains("Sign-in failed"));
        assert!(without_notice.contains(r#"action="/login/google""#));
        assert!(without_notice.contains(r#"action="/login/github""#));
    }

    #[test]
    fn logout_page_refreshes_home() {
        let templates = Templates::new().unwrap();

        let html = templates
            .render(
                "logout.html",
                context! { page => LogoutState::Error.view(&LogoutDelays::default()) },
            )
            .unwrap();

        assert!(html.contains(r#"content="2; url=/""#));
        assert!(html.contains(LogoutState::Error.message()));
    }
}
