pub const MAIN_NAV: &str = ".main-nav";
pub const NAV_LINKS: &str = ".nav-links";
pub const NAV_LINK_ANCHORS: &str = ".nav-links a";
pub const NAV_SECTION_LINKS: &str = ".nav-links a[href^=\"#\"]";
pub const MENU_TOGGLE: &str = ".menu-toggle";

pub const CURSOR: &str = ".cursor";
pub const CURSOR_FOLLOWER: &str = ".cursor-follower";

pub const SECTIONS: &str = "section";
pub const SECTIONS_WITH_ID: &str = "section[id]";
pub const REVEAL_CARDS: &str = ".project-card, .capability-card";
pub const STAGGER_CHILDREN: &str = ".stagger-animate";
pub const PROJECT_CARD: &str = ".project-card";
pub const PROJECT_LINK: &str = ".project-link";
pub const PROJECT_TITLE: &str = ".project-title";

pub const PARALLAX: &str = "[data-parallax]";
pub const PARALLAX_KEY: &str = "parallax";

pub const HERO_STATS: &str = ".hero-stats";
pub const STAT_NUMBER: &str = ".stat-number";

pub const LAZY_IMAGES: &str = "img[data-src]";
pub const DATA_SRC: &str = "data-src";
pub const DATA_SRC_MOBILE: &str = "data-src-mobile";

pub const CONTACT_FORM: &str = ".contact-form";
pub const FORM_FIELDS: &str = "input, textarea";
pub const SUBMIT_BUTTON: &str = "button[type=\"submit\"]";
pub const SUBMIT_LABEL: &str = "span";

pub const IN_PAGE_ANCHORS: &str = "a[href^=\"#\"]";
pub const MAILTO_LINKS: &str = "a[href^=\"mailto:\"]";

pub const FLOATING_ELEMENT: &str = ".floating-element";
pub const FLOATING_CARD: &str = ".floating-card";
pub const TECH_GRID_ITEMS: &str = ".tech-grid span";

pub const CLASS_ACTIVE: &str = "active";
pub const CLASS_SCROLLED: &str = "scrolled";
pub const CLASS_ANIMATE_IN: &str = "animate-in";
pub const CLASS_LOADED: &str = "loaded";
pub const CLASS_FOCUSED: &str = "focused";

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    const HOME_PAGE: &str = include_str!("../site/index.html");
    const NOT_FOUND_PAGE: &str = include_str!("../site/404.html");

    fn count(document: &Html, selector: &str) -> usize {
        let selector = Selector::parse(selector).expect("contract selector parses");
        document.select(&selector).count()
    }

    #[test]
    fn home_page_carries_every_home_hook() {
        let document = Html::parse_document(HOME_PAGE);

        for selector in [
            MAIN_NAV,
            NAV_LINKS,
            MENU_TOGGLE,
            CURSOR,
            CURSOR_FOLLOWER,
            SECTIONS_WITH_ID,
            PROJECT_CARD,
            PARALLAX,
            HERO_STATS,
            STAT_NUMBER,
            LAZY_IMAGES,
            CONTACT_FORM,
            MAILTO_LINKS,
            FLOATING_CARD,
            TECH_GRID_ITEMS,
        ] {
            assert!(count(&document, selector) > 0, "home page lacks {selector}");
        }
    }

    #[test]
    fn every_section_link_points_at_an_existing_section() {
        let document = Html::parse_document(HOME_PAGE);
        let links = Selector::parse(NAV_SECTION_LINKS).expect("valid selector");

        for link in document.select(&links) {
            let href = link.value().attr("href").unwrap_or_default();
            let section = format!("section{href}");
            assert_eq!(count(&document, &section), 1, "no section for {href}");
        }
    }

    #[test]
    fn not_found_page_declares_profile_and_floating_elements() {
        let document = Html::parse_document(NOT_FOUND_PAGE);

        assert_eq!(count(&document, "body[data-page=\"not-found\"]"), 1);
        assert!(count(&document, FLOATING_ELEMENT) > 0);
        assert!(count(&document, MAILTO_LINKS) > 0);
    }

    #[test]
    fn contact_form_has_a_labelled_submit_button() {
        let document = Html::parse_document(HOME_PAGE);
        let selector = format!("{CONTACT_FORM} {SUBMIT_BUTTON} {SUBMIT_LABEL}");
        assert_eq!(count(&document, &selector), 1);
    }
}
