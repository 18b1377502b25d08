//! Built-in English recognizers.

use crate::error::AnalyzerError;
use crate::recognizer::{Pattern, PatternRecognizer, Recognizer};
use crate::validators;

/// Entity types produced by the built-in recognizers, in registration order.
pub const BUILTIN_ENTITIES: &[&str] = &[
    "EMAIL_ADDRESS",
    "PHONE_NUMBER",
    "CREDIT_CARD",
    "US_SSN",
    "IP_ADDRESS",
    "URL",
    "IBAN_CODE",
    "PERSON",
    "DATE_TIME",
];

struct BuiltinDef {
    name: &'static str,
    entity: &'static str,
    patterns: &'static [(&'static str, &'static str, f32)],
    validator: Option<validators::Validator>,
    trimmer: Option<validators::Trimmer>,
}

const BUILTINS: &[BuiltinDef] = &[
    BuiltinDef {
        name: "email",
        entity: "EMAIL_ADDRESS",
        patterns: &[(
            "email",
            r"\b[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}\b",
            1.0,
        )],
        validator: None,
        trimmer: None,
    },
    BuiltinDef {
        name: "phone",
        entity: "PHONE_NUMBER",
        patterns: &[
            ("nanp", r"\(?\b\d{3}\)?[\s.\-]\d{3}[\s.\-]\d{4}\b", 0.4),
            (
                "international",
                r"\+\d{1,3}[\s.\-]?\d{1,4}(?:[\s.\-]?\d{2,4}){2,4}\b",
                0.4,
            ),
        ],
        validator: Some(validators::phone_digits),
        trimmer: None,
    },
    BuiltinDef {
        name: "credit_card",
        entity: "CREDIT_CARD",
        patterns: &[("card_number", r"\b(?:\d[ \-]?){12,18}\d\b", 1.0)],
        validator: Some(validators::luhn),
        trimmer: None,
    },
    BuiltinDef {
        name: "us_ssn",
        entity: "US_SSN",
        patterns: &[("ssn", r"\b\d{3}[\- ]\d{2}[\- ]\d{4}\b", 0.85)],
        validator: Some(validators::us_ssn),
        trimmer: None,
    },
    BuiltinDef {
        name: "ip_address",
        entity: "IP_ADDRESS",
        patterns: &[("ipv4", r"\b(?:\d{1,3}\.){3}\d{1,3}\b", 0.6)],
        validator: Some(validators::ipv4),
        trimmer: None,
    },
    BuiltinDef {
        name: "url",
        entity: "URL",
        patterns: &[(
            "url",
            r#"\b(?:https?://|www\.)[^\s<>"']*[^\s<>"'.,;:!?)]"#,
            0.5,
        )],
        validator: None,
        trimmer: None,
    },
    BuiltinDef {
        name: "iban",
        entity: "IBAN_CODE",
        patterns: &[(
            "iban",
            r"\b[A-Z]{2}\d{2}(?:[ ]?[A-Z0-9]{4}){2,7}(?:[ ]?[A-Z0-9]{1,3})?\b",
            1.0,
        )],
        validator: Some(validators::iban),
        trimmer: None,
    },
    BuiltinDef {
        name: "person",
        entity: "PERSON",
        patterns: &[("capitalized_words", r"\b[A-Z][a-z]+(?:[ \-][A-Z][a-z]+)+\b", 0.85)],
        validator: None,
        trimmer: Some(validators::person_name_span),
    },
    BuiltinDef {
        name: "date_time",
        entity: "DATE_TIME",
        patterns: &[
            (
                "iso_date",
                r"\b\d{4}-\d{2}-\d{2}(?:[T ]\d{2}:\d{2}(?::\d{2})?)?\b",
                0.6,
            ),
            ("day_month_year", r"\b\d{1,2}[/.]\d{1,2}[/.]\d{4}\b", 0.6),
        ],
        validator: Some(validators::calendar_date),
        trimmer: None,
    },
];

/// Compiles the built-in recognizers.
///
/// # Errors
///
/// Returns [`AnalyzerError::InvalidPattern`] if a built-in expression fails
/// to compile.
pub fn builtin_recognizers() -> Result<Vec<Box<dyn Recognizer>>, AnalyzerError> {
    BUILTINS
        .iter()
        .map(|def| {
            let patterns = def
                .patterns
                .iter()
                .map(|(name, expression, score)| Pattern::new(def.name, *name, expression, *score))
                .collect::<Result<Vec<_>, _>>()?;
            let mut recognizer = PatternRecognizer::new(def.name, def.entity, patterns);
            if let Some(validator) = def.validator {
                recognizer = recognizer.with_validator(validator);
            }
            if let Some(trimmer) = def.trimmer {
                recognizer = recognizer.with_trimmer(trimmer);
            }
            Ok(Box::new(recognizer) as Box<dyn Recognizer>)
        })
        .collect()
}
