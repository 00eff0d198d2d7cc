//! Random identifiers

use uuid::Uuid;

/// Random version 4 UUID in hyphenated lowercase form,
/// `xxxxxxxx-xxxx-4xxx-[89ab]xxx-xxxxxxxxxxxx`
pub fn uuid() -> String {
    Uuid::new_v4().hyphenated().to_string()
}
