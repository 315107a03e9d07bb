use std::collections::HashMap;

use crate::domain::{Participant, RawParticipant};

/// Extract the phone number from a provider id like `234801234567@c.us`.
///
/// Returns the substring before the first `@`, or `""` when there is no
/// recognizable local part. `""` is the "no phone available" signal consumed
/// downstream; this never fails.
pub fn id_to_phone(id: &str) -> String {
    match id.split_once('@') {
        Some((local, _)) => local.to_string(),
        None => String::new(),
    }
}

/// Pick a display name for a raw participant.
///
/// Priority: formatted display name, push name, the id's local part, the
/// generic name field, empty string.
fn display_name(raw: &RawParticipant, phone: &str) -> String {
    let candidates = [
        raw.formatted_name.as_deref(),
        raw.pushname.as_deref(),
        if phone.is_empty() { None } else { Some(phone) },
        raw.name.as_deref(),
    ];
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Merge a raw member list into unique participants.
///
/// The merge key is the phone when present, otherwise `"name:"` plus the
/// lower-cased name, so phone-keyed and name-keyed entries never collapse
/// into each other. First-seen key order is preserved; on a collision a
/// phone-bearing entry replaces a phoneless one, otherwise the first entry
/// wins.
pub fn dedupe(raw: &[RawParticipant]) -> Vec<Participant> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<Participant> = Vec::new();

    for r in raw {
        let phone = id_to_phone(&r.id);
        let name = display_name(r, &phone);
        let key = if phone.is_empty() {
            format!("name:{}", name.to_lowercase())
        } else {
            phone.clone()
        };

        let entry = Participant { name, phone };
        match index.get(&key) {
            None => {
                index.insert(key, out.len());
                out.push(entry);
            }
            Some(&i) => {
                if out[i].phone.is_empty() && !entry.phone.is_empty() {
                    out[i] = entry;
                }
            }
        }
    }

    out
}
