//! Page boilerplate removal for extracted certificate text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Stamp + page marker of one page glued to the running header of the next:
    /// `[section header]М.П.Стр.N ТС BY А-BY.x.y Свидетельство о безопасности
    /// конструкции транспортного средства №`.
    static ref PAGE_BOILERPLATE: Regex = Regex::new(
        r"(?i)(?:(?:ОБЩИЕ\s*ХАРАКТЕРИСТИКИ\s*ТРАНСПОРТНОГО\s*СРЕДСТВА|ТРАНСПОРТНОЕ\s*СРЕДСТВО)\s*)?М\.\s*П\.\s*Стр\.\s*\d+\s*ТС\s*BY\s*[АA]\s*-\s*BY\.\d+\.\d+\s*Свидетельство\s*о\s*безопасности\s*конструкции\s*транспортного\s*средства\s*№"
    ).unwrap();
}

/// Remove recurring page headers/footers from raw document text.
///
/// Only the boilerplate runs are removed; line structure is kept intact for
/// the multi-line field rules. Removal repeats until nothing matches, so a
/// run that only forms after an inner removal is removed as well and
/// `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    let mut text = raw.to_string();
    loop {
        let next = PAGE_BOILERPLATE.replace_all(&text, "");
        if next.len() == text.len() {
            return text;
        }
        text = next.into_owned();
    }
}

/// Whether `text` still carries page boilerplate.
pub fn has_boilerplate(text: &str) -> bool {
    PAGE_BOILERPLATE.is_match(text)
}
