use tera::Tera;

macro_rules! embedded {
    ($($name:literal),* $(,)?) => {
        [$(($name, include_str!(concat!("../../templates/", $name)))),*]
    };
}

/// Page templates compiled into the binary.
const TEMPLATES: [(&str, &str); 15] = embedded![
    "base.html",
    "macros.html",
    "home.html",
    "events.html",
    "event.html",
    "news.html",
    "article.html",
    "fighters.html",
    "fighter.html",
    "glossary.html",
    "faq.html",
    "about.html",
    "privacy.html",
    "community.html",
    "not_found.html",
];

/// Parses the embedded templates.
///
/// # Errors
///
/// Returns an error if a template does not parse or extends a missing
/// parent.
pub fn load() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES)?;
    Ok(tera)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_parses() {
        let tera = load().unwrap();
        let names: Vec<_> = tera.get_template_names().collect();

        for (name, _) in TEMPLATES {
            assert!(names.contains(&name), "{name} missing");
        }
    }
}
