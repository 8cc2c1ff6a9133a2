//! Request validation for destination and review payloads.
//!
//! The engine is a set of pure functions over a [`RawPayload`] (decoded
//! multipart fields). Create mode requires every mandatory field; update mode
//! treats every field as optional but still applies the shape rules to the
//! fields that are present. Failures are collected per field into a
//! [`FieldErrors`] map; the first failing rule per field wins.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// An uploaded file part from a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Decoded request body: text fields plus file uploads, keyed by field name.
#[derive(Debug, Default)]
pub struct RawPayload {
    pub values: BTreeMap<String, String>,
    pub uploads: BTreeMap<String, Upload>,
}

/// Map from field name to the messages for that field, insertion-stable per
/// field. Serializes as the `errors` object of a 422 response.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    fn push(&mut self, field: &'static str, message: String) {
        self.0.entry(field).or_default().push(message);
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Create,
    Update,
}

/// Validated create payload for a destination. `description` stays optional;
/// the handler merges in the generated fallback.
#[derive(Debug)]
pub struct ValidDestination {
    pub photo_1: Upload,
    pub photo_2: Upload,
    pub name: String,
    pub price: f64,
    pub meta_description: String,
    pub description: Option<String>,
}

/// Validated partial update for a destination: only the supplied fields.
#[derive(Debug, Default)]
pub struct DestinationChanges {
    pub photo_1: Option<Upload>,
    pub photo_2: Option<Upload>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub meta_description: Option<String>,
    pub description: Option<String>,
}

/// Validated create payload for a review.
#[derive(Debug)]
pub struct ValidReview {
    pub photo: Upload,
    pub review: String,
    pub user_name: String,
}

/// Validated partial update for a review.
#[derive(Debug, Default)]
pub struct ReviewChanges {
    pub photo: Option<Upload>,
    pub review: Option<String>,
    pub user_name: Option<String>,
}

pub fn destination_create(mut payload: RawPayload) -> Result<ValidDestination, FieldErrors> {
    let mut errors = FieldErrors::default();

    let photo_1 = take_image(&mut payload, "photo_1", Mode::Create, &mut errors);
    let mut photo_2 = take_image(&mut payload, "photo_2", Mode::Create, &mut errors);
    check_distinct_photos(&photo_1, &mut photo_2, &mut errors);

    let name = take_text(&mut payload, "name", 1, None, Mode::Create, &mut errors);
    let price = take_price(&mut payload, Mode::Create, &mut errors);
    let meta_description = take_text(
        &mut payload,
        "meta_description",
        1,
        None,
        Mode::Create,
        &mut errors,
    );
    let description = payload.values.remove("description");

    match (photo_1, photo_2, name, price, meta_description) {
        (Some(photo_1), Some(photo_2), Some(name), Some(price), Some(meta_description))
            if errors.is_empty() =>
        {
            Ok(ValidDestination {
                photo_1,
                photo_2,
                name,
                price,
                meta_description,
                description,
            })
        }
        _ => Err(errors),
    }
}

pub fn destination_update(mut payload: RawPayload) -> Result<DestinationChanges, FieldErrors> {
    let mut errors = FieldErrors::default();

    let photo_1 = take_image(&mut payload, "photo_1", Mode::Update, &mut errors);
    let mut photo_2 = take_image(&mut payload, "photo_2", Mode::Update, &mut errors);
    check_distinct_photos(&photo_1, &mut photo_2, &mut errors);

    let changes = DestinationChanges {
        photo_1,
        photo_2,
        name: take_text(&mut payload, "name", 1, None, Mode::Update, &mut errors),
        price: take_price(&mut payload, Mode::Update, &mut errors),
        meta_description: take_text(
            &mut payload,
            "meta_description",
            1,
            None,
            Mode::Update,
            &mut errors,
        ),
        description: payload.values.remove("description"),
    };

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(errors)
    }
}

pub fn review_create(mut payload: RawPayload) -> Result<ValidReview, FieldErrors> {
    let mut errors = FieldErrors::default();

    let photo = take_image(&mut payload, "photo", Mode::Create, &mut errors);
    let review = take_text(&mut payload, "review", 20, Some(150), Mode::Create, &mut errors);
    let user_name = take_text(&mut payload, "user_name", 2, None, Mode::Create, &mut errors);

    match (photo, review, user_name) {
        (Some(photo), Some(review), Some(user_name)) if errors.is_empty() => Ok(ValidReview {
            photo,
            review,
            user_name,
        }),
        _ => Err(errors),
    }
}

pub fn review_update(mut payload: RawPayload) -> Result<ReviewChanges, FieldErrors> {
    let mut errors = FieldErrors::default();

    let changes = ReviewChanges {
        photo: take_image(&mut payload, "photo", Mode::Update, &mut errors),
        review: take_text(&mut payload, "review", 20, Some(150), Mode::Update, &mut errors),
        user_name: take_text(&mut payload, "user_name", 2, None, Mode::Update, &mut errors),
    };

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(errors)
    }
}

/// Field name as it appears in messages: underscores become spaces
/// ("user_name" -> "user name"). Error-map keys keep the raw name.
fn label(field: &'static str) -> String {
    field.replace('_', " ")
}

fn take_image(
    payload: &mut RawPayload,
    field: &'static str,
    mode: Mode,
    errors: &mut FieldErrors,
) -> Option<Upload> {
    if let Some(upload) = payload.uploads.remove(field) {
        if sniff_image(&upload.bytes) {
            return Some(upload);
        }
        errors.push(field, format!("The {} field must be an image.", label(field)));
        return None;
    }
    // A plain text value under a file field name can never be an image.
    if payload.values.remove(field).is_some() {
        errors.push(field, format!("The {} field must be an image.", label(field)));
        return None;
    }
    if mode == Mode::Create {
        errors.push(field, format!("The {} field is required.", label(field)));
    }
    None
}

/// Cross-field rule: `photo_2` must not carry the same content as `photo_1`.
/// Applies whenever both uploads are present in the same request.
fn check_distinct_photos(
    photo_1: &Option<Upload>,
    photo_2: &mut Option<Upload>,
    errors: &mut FieldErrors,
) {
    if let (Some(first), Some(second)) = (photo_1.as_ref(), photo_2.as_ref()) {
        if Sha256::digest(&first.bytes) == Sha256::digest(&second.bytes) {
            errors.push(
                "photo_2",
                "The photo 2 field must not match the photo 1 field.".to_string(),
            );
            *photo_2 = None;
        }
    }
}

fn take_text(
    payload: &mut RawPayload,
    field: &'static str,
    min_chars: usize,
    max_chars: Option<usize>,
    mode: Mode,
    errors: &mut FieldErrors,
) -> Option<String> {
    let value = match payload.values.remove(field) {
        Some(value) => value,
        None => {
            if mode == Mode::Create {
                errors.push(field, format!("The {} field is required.", label(field)));
            }
            return None;
        }
    };
    // An empty text part counts as absent for the required rule.
    if value.is_empty() && mode == Mode::Create {
        errors.push(field, format!("The {} field is required.", label(field)));
        return None;
    }
    let chars = value.chars().count();
    if chars < min_chars {
        errors.push(
            field,
            format!(
                "The {} field must be at least {} characters.",
                label(field),
                min_chars
            ),
        );
        return None;
    }
    if let Some(max) = max_chars {
        if chars > max {
            errors.push(
                field,
                format!(
                    "The {} field must not be greater than {} characters.",
                    label(field),
                    max
                ),
            );
            return None;
        }
    }
    Some(value)
}

fn take_price(
    payload: &mut RawPayload,
    mode: Mode,
    errors: &mut FieldErrors,
) -> Option<f64> {
    let raw = match payload.values.remove("price") {
        Some(raw) => raw,
        None => {
            if mode == Mode::Create {
                errors.push("price", "The price field is required.".to_string());
            }
            return None;
        }
    };
    if raw.is_empty() && mode == Mode::Create {
        errors.push("price", "The price field is required.".to_string());
        return None;
    }
    if !is_strict_decimal(&raw) {
        errors.push("price", "The price field must be a number.".to_string());
        return None;
    }
    let places = raw.split('.').nth(1).map_or(0, str::len);
    if places > 2 {
        errors.push(
            "price",
            "The price field must have 0-2 decimal places.".to_string(),
        );
        return None;
    }
    let value: f64 = match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            errors.push("price", "The price field must be a number.".to_string());
            return None;
        }
    };
    let min = match mode {
        Mode::Create => 1,
        Mode::Update => 0,
    };
    if value < f64::from(min) {
        errors.push(
            "price",
            format!("The price field must be at least {min}."),
        );
        return None;
    }
    Some(value)
}

/// Strict decimal shape: optional leading minus, digits, optional fractional
/// part. No whitespace, signs inside, exponents, or stray characters.
fn is_strict_decimal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix('-').unwrap_or(raw);
    let mut parts = unsigned.splitn(2, '.');
    let integral = parts.next().unwrap_or("");
    let fractional = parts.next();
    if integral.is_empty() || !integral.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    fractional.map_or(true, |frac| {
        !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit())
    })
}

/// Content-based image check (magic bytes), deliberately not extension-based.
fn sniff_image(bytes: &[u8]) -> bool {
    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";
    bytes.starts_with(&[0xFF, 0xD8, 0xFF])
        || bytes.starts_with(PNG)
        || bytes.starts_with(b"GIF87a")
        || bytes.starts_with(b"GIF89a")
        || (bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP")
        || bytes.starts_with(b"BM")
}
