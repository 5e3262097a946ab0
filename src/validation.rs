//! Table-driven form field validation
//!
//! Each required field has one entry in a declarative rule table: a predicate
//! over the field's current value returning either an empty string (valid) or
//! a user-facing message. Evaluation is pure, idempotent, and
//! order-insensitive; optional fields always validate.

use crate::types::{Field, FieldErrorMap, FormFields};

/// One validation rule: a field and the check applied to its value.
struct FieldRule {
    field: Field,
    check: fn(&str) -> &'static str,
}

/// The rule table. Every required field appears exactly once.
const RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::WelcomePage,
        check: check_welcome_page,
    },
    FieldRule {
        field: Field::Favicon,
        check: check_favicon,
    },
    FieldRule {
        field: Field::Language,
        check: check_required_language,
    },
    FieldRule {
        field: Field::Title,
        check: check_required_title,
    },
];

fn check_welcome_page(value: &str) -> &'static str {
    if value.trim().is_empty() {
        return "Main HTML page is required";
    }
    if !ends_with_any(value, &[".html", ".htm"]) {
        return "Main page must end in .html or .htm";
    }
    ""
}

fn check_favicon(value: &str) -> &'static str {
    if value.trim().is_empty() {
        return "Website icon is required";
    }
    if !ends_with_any(value, &[".png", ".jpg", ".jpeg"]) {
        return "Icon must end in .png, .jpg or .jpeg";
    }
    ""
}

fn check_required_language(value: &str) -> &'static str {
    if value.trim().is_empty() {
        return "Language is required";
    }
    ""
}

fn check_required_title(value: &str) -> &'static str {
    if value.trim().is_empty() {
        return "Title is required";
    }
    ""
}

/// Case-insensitive suffix check against a set of extensions.
fn ends_with_any(value: &str, suffixes: &[&str]) -> bool {
    let lower = value.trim().to_lowercase();
    suffixes.iter().any(|s| lower.ends_with(s))
}

/// Validate one field against its rule.
///
/// Returns an empty string when the field is valid or has no rule (optional
/// fields always pass).
pub fn validate_field(fields: &FormFields, field: Field) -> String {
    RULES
        .iter()
        .find(|rule| rule.field == field)
        .map(|rule| (rule.check)(fields.get(field)))
        .unwrap_or("")
        .to_string()
}

/// Validate every required field and return the union of the results.
///
/// Every required field gets an entry; an empty message means "validated, no
/// error". Re-running with unchanged input yields an identical map.
pub fn validate_form(fields: &FormFields) -> FieldErrorMap {
    RULES
        .iter()
        .map(|rule| (rule.field, (rule.check)(fields.get(rule.field)).to_string()))
        .collect()
}

/// Whether an error map represents a fully valid form.
///
/// True iff every required field has an entry and that entry is empty. Note
/// the aggregate form additionally needs a valid file selection; the state
/// machine checks that separately with the file guard.
pub fn form_is_valid(errors: &FieldErrorMap) -> bool {
    Field::REQUIRED
        .iter()
        .all(|field| errors.get(field).is_some_and(String::is_empty))
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> FormFields {
        let mut form = FormFields::default();
        form.set(Field::WelcomePage, "index.html");
        form.set(Field::Favicon, "favicon.png");
        form.set(Field::Language, "eng");
        form.set(Field::Title, "Our Website");
        form
    }

    #[test]
    fn welcome_page_accepts_html_and_htm_case_insensitively() {
        let mut form = valid_form();
        for value in ["index.html", "docs/index.htm", "SITE/INDEX.HTML", "a.HtM"] {
            form.set(Field::WelcomePage, value);
            assert_eq!(validate_field(&form, Field::WelcomePage), "", "{value}");
        }
    }

    #[test]
    fn welcome_page_rejects_wrong_extension() {
        let mut form = valid_form();
        form.set(Field::WelcomePage, "docs/index.txt");
        assert_eq!(
            validate_field(&form, Field::WelcomePage),
            "Main page must end in .html or .htm"
        );
    }

    #[test]
    fn welcome_page_rejects_empty() {
        let mut form = valid_form();
        form.set(Field::WelcomePage, "");
        assert_eq!(
            validate_field(&form, Field::WelcomePage),
            "Main HTML page is required"
        );
    }

    #[test]
    fn favicon_accepts_png_jpg_jpeg() {
        let mut form = valid_form();
        for value in ["favicon.png", "img/icon.jpg", "ICON.JPEG", "a/b/c.PNG"] {
            form.set(Field::Favicon, value);
            assert_eq!(validate_field(&form, Field::Favicon), "", "{value}");
        }
    }

    #[test]
    fn favicon_rejects_wrong_extension_and_empty() {
        let mut form = valid_form();
        form.set(Field::Favicon, "icon.gif");
        assert_eq!(
            validate_field(&form, Field::Favicon),
            "Icon must end in .png, .jpg or .jpeg"
        );

        form.set(Field::Favicon, "   ");
        assert_eq!(validate_field(&form, Field::Favicon), "Website icon is required");
    }

    #[test]
    fn language_and_title_only_require_non_empty() {
        let mut form = valid_form();
        form.set(Field::Language, "  ");
        assert_eq!(validate_field(&form, Field::Language), "Language is required");
        form.set(Field::Language, "spa");
        assert_eq!(validate_field(&form, Field::Language), "");

        form.set(Field::Title, "");
        assert_eq!(validate_field(&form, Field::Title), "Title is required");
        form.set(Field::Title, "T");
        assert_eq!(validate_field(&form, Field::Title), "");
    }

    #[test]
    fn optional_fields_always_validate() {
        let mut form = FormFields::default();
        form.set(Field::Description, "");
        form.set(Field::Creator, "");
        form.set(Field::Publisher, "");

        for field in [Field::Description, Field::Creator, Field::Publisher] {
            assert_eq!(validate_field(&form, field), "");
        }
    }

    #[test]
    fn validate_form_returns_an_entry_for_every_required_field() {
        let errors = validate_form(&FormFields::default());

        assert_eq!(errors.len(), Field::REQUIRED.len());
        for field in Field::REQUIRED {
            assert!(
                !errors.get(&field).unwrap().is_empty(),
                "{field} should have an error on an empty form"
            );
        }
        assert!(!form_is_valid(&errors));
    }

    #[test]
    fn validate_form_on_valid_input_is_all_empty() {
        let errors = validate_form(&valid_form());

        for field in Field::REQUIRED {
            assert_eq!(errors.get(&field).unwrap(), "", "{field}");
        }
        assert!(form_is_valid(&errors));
    }

    #[test]
    fn validation_is_idempotent() {
        let form = valid_form();
        assert_eq!(validate_form(&form), validate_form(&form));

        let empty = FormFields::default();
        assert_eq!(validate_form(&empty), validate_form(&empty));
    }

    #[test]
    fn form_is_valid_requires_entries_to_be_present() {
        // An empty map means "not yet validated", not "no errors"
        assert!(!form_is_valid(&FieldErrorMap::new()));
    }
}
