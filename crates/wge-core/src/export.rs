//! Pure export serializers. Callers fetch the participant list from the
//! cache and pass it in; nothing here reads shared state.

use crate::domain::Participant;

/// Render participants as CSV with a `name,phone` header.
///
/// Every field is double-quoted; embedded quotes are escaped by doubling.
/// An empty phone renders as an empty quoted field.
pub fn to_csv(participants: &[Participant]) -> String {
    let mut rows = Vec::with_capacity(participants.len() + 1);
    rows.push("name,phone".to_string());
    for p in participants {
        rows.push(format!(
            "\"{}\",\"{}\"",
            csv_escape(&p.name),
            csv_escape(&p.phone)
        ));
    }
    rows.join("\n")
}

fn csv_escape(field: &str) -> String {
    field.replace('"', "\"\"")
}

/// Render participants as a vCard 3.0 document, one block per participant,
/// in input order.
///
/// Names have embedded newlines collapsed to spaces and are trimmed; an
/// empty sanitized name becomes `Unknown`. The `TEL` line is omitted when
/// the phone is empty.
pub fn to_vcf(participants: &[Participant]) -> String {
    let mut lines = Vec::new();
    for p in participants {
        let name = sanitize_vcf_name(&p.name);
        lines.push("BEGIN:VCARD".to_string());
        lines.push("VERSION:3.0".to_string());
        lines.push(format!("FN:{name}"));
        if !p.phone.is_empty() {
            lines.push(format!("TEL;TYPE=CELL:{}", p.phone));
        }
        lines.push("END:VCARD".to_string());
    }
    lines.join("\n")
}

fn sanitize_vcf_name(name: &str) -> String {
    let collapsed = name.replace(['\r', '\n'], " ");
    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        "Unknown".to_string()
    } else {
        trimmed.to_string()
    }
}
