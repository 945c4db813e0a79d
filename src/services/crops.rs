//! Crops-by-region reference data
//!
//! Immutable lookup table mapping country names to their most common
//! crops. Loaded once into the binary; never mutated at runtime.

/// Region keys and their common crops, in match-priority order
static CROPS_BY_REGION: &[(&str, &[&str])] = &[
    // Latin America
    (
        "mexico",
        &["maize", "beans", "chili", "tomato", "avocado", "sugarcane"],
    ),
    (
        "colombia",
        &["coffee", "plantain", "rice", "potato", "sugarcane", "cassava"],
    ),
    (
        "peru",
        &["potato", "quinoa", "maize", "coffee", "cacao", "rice"],
    ),
    (
        "argentina",
        &["soybean", "wheat", "maize", "sunflower", "grapevine", "barley"],
    ),
    (
        "chile",
        &["grape", "apple", "avocado", "cherry", "wheat", "maize"],
    ),
    (
        "brazil",
        &["soybean", "sugarcane", "coffee", "maize", "orange", "cotton"],
    ),
    // Europe
    (
        "spain",
        &["wheat", "barley", "grapevine", "olive", "sunflower", "tomato"],
    ),
    (
        "italy",
        &["wheat", "grapevine", "olive", "tomato", "maize", "rice"],
    ),
    (
        "france",
        &["wheat", "barley", "grapevine", "sunflower", "maize", "sugar beet"],
    ),
    // Asia
    (
        "india",
        &["rice", "wheat", "cotton", "sugarcane", "tea", "jute"],
    ),
    (
        "china",
        &["rice", "wheat", "maize", "soybean", "potato", "tea"],
    ),
    ("japan", &["rice", "soybean", "tea", "barley", "wheat"]),
    // Africa
    (
        "egypt",
        &["wheat", "rice", "maize", "cotton", "sugarcane"],
    ),
    (
        "south africa",
        &["maize", "wheat", "sugarcane", "sunflower", "grapevine"],
    ),
    // North America
    (
        "usa",
        &["maize", "soybean", "wheat", "cotton", "potato", "tomato"],
    ),
    (
        "canada",
        &["wheat", "canola", "barley", "soybean", "maize"],
    ),
];

/// Generic crops returned when the region is not in the table
static DEFAULT_CROPS: &[&str] = &["wheat", "maize", "rice", "potato", "tomato", "beans"];

/// Look up common crops for a free-text location label
///
/// Case-insensitive substring match against each region key in
/// declaration order; the first matching region wins. Unknown locations
/// get the generic default list.
pub fn crops_for(location: &str) -> &'static [&'static str] {
    let location = location.to_lowercase();

    for (region, crops) in CROPS_BY_REGION {
        if location.contains(region) {
            return crops;
        }
    }

    DEFAULT_CROPS
}
