//! CSV column ordering
//!
//! Two orderings are in play: the export order, driven by a fixed priority
//! list with everything unknown appended alphabetically, and the template
//! order, which groups the mockup and variant columns together so a blank
//! template reads naturally.

use std::cmp::Ordering;

/// Export column priority. Columns listed here come first, in this order;
/// unlisted columns follow alphabetically (mockup columns by index).
pub const EXPORT_PRIORITY: &[&str] = &[
    "name",
    "type",
    "prefix",
    "price",
    "product",
    "sizeImpression",
    "sku",
    "alias",
    "CompositeItem",
    "parentSku",
    "variant1Type",
    "variant1Values",
    "variant2Type",
    "variant2Values",
    "weight",
    "width",
    "amazon.DesCourtes",
    "amazon.title",
    "amazon.Title_FR",
    "aspect",
    "category",
    "densite",
    "dimentions",
    "dossier",
    "ERPCategory",
    "genre",
    "height",
    "label",
    "length",
    "picture_1",
    "picture_2",
    "picture_3",
    "picture_4",
    "picture_5",
    "picture_6",
    "picture_7",
    "picture_8",
    "mockups_name_0",
    "mockups_path_0",
    "psd",
];

/// Numeric suffix of a `mockups_path_<i>`/`mockups_name_<i>` column.
pub fn mockup_index(header: &str) -> Option<u32> {
    let rest = header
        .strip_prefix("mockups_path_")
        .or_else(|| header.strip_prefix("mockups_name_"))?;
    rest.parse().ok()
}

fn priority_index(header: &str) -> Option<usize> {
    EXPORT_PRIORITY.iter().position(|p| *p == header)
}

fn compare_mockups(a: &str, b: &str) -> Option<Ordering> {
    let (ia, ib) = (mockup_index(a)?, mockup_index(b)?);
    Some(ia.cmp(&ib).then_with(|| a.cmp(b)))
}

/// Export ordering: priority-listed columns first, then mockup columns by
/// index (name before path at each index), then the rest alphabetically.
pub fn export_header_order(a: &str, b: &str) -> Ordering {
    match (priority_index(a), priority_index(b)) {
        (Some(ia), Some(ib)) => ia.cmp(&ib),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_mockups(a, b).unwrap_or_else(|| a.cmp(b)),
    }
}

const TEMPLATE_GROUPS: usize = 4;

fn template_group(header: &str) -> usize {
    match header {
        "name" => 0,
        "type" => 1,
        _ if mockup_index(header).is_some() => 2,
        "variant1Type" | "variant1Values" | "variant2Type" | "variant2Values" => 3,
        _ => TEMPLATE_GROUPS,
    }
}

/// Template ordering: `name`, `type`, the mockup columns by index, the four
/// variant summary columns, then everything else alphabetically.
pub fn template_header_order(a: &str, b: &str) -> Ordering {
    let (ga, gb) = (template_group(a), template_group(b));
    if ga != gb {
        return ga.cmp(&gb);
    }
    match ga {
        2 => compare_mockups(a, b).unwrap_or_else(|| a.cmp(b)),
        3 => {
            let rank = |h: &str| {
                ["variant1Type", "variant1Values", "variant2Type", "variant2Values"]
                    .iter()
                    .position(|v| *v == h)
            };
            rank(a).cmp(&rank(b))
        }
        _ => a.cmp(b),
    }
}

fn sorted_dedup(mut headers: Vec<String>, order: fn(&str, &str) -> Ordering) -> Vec<String> {
    headers.sort_by(|a, b| order(a, b));
    headers.dedup();
    headers
}

/// Deduplicate and sort headers for export.
pub fn sort_export_headers(headers: Vec<String>) -> Vec<String> {
    sorted_dedup(headers, export_header_order)
}

/// Deduplicate and sort headers for the blank template.
pub fn sort_template_headers(headers: Vec<String>) -> Vec<String> {
    sorted_dedup(headers, template_header_order)
}
