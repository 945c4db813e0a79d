//! Property-based tests for the pure context/lookup functions

use proptest::prelude::*;

use agromine_backend::services::chat::{
    build_history, is_first_exchange, water_context, ChatMessage, ChatRole,
};
use agromine_backend::services::crops::crops_for;
use agromine_backend::services::weather::co2_narrative;

// ============================================================================
// CO2 narrative: total, default-safe function over the AQI ordinal
// ============================================================================

proptest! {
    #[test]
    fn prop_co2_narrative_out_of_range_is_dangerous(aqi in any::<i64>()) {
        prop_assume!(!(1..=4).contains(&aqi));
        prop_assert_eq!(co2_narrative(aqi), "Dangerous CO2 levels (>600 ppm)");
    }

    #[test]
    fn prop_co2_narrative_in_range_is_distinct(aqi in 1i64..=4) {
        let narrative = co2_narrative(aqi);
        prop_assert_ne!(narrative, "Dangerous CO2 levels (>600 ppm)");
        for other in 1i64..=4 {
            if other != aqi {
                prop_assert_ne!(narrative, co2_narrative(other));
            }
        }
    }
}

// ============================================================================
// Crop lookup: case-insensitive substring matching with a fixed default
// ============================================================================

proptest! {
    /// Strings with no ASCII letters cannot contain a region key
    #[test]
    fn prop_unmatched_location_gets_default_crops(location in "[0-9 ,.-]{0,30}") {
        let crops = crops_for(&location);
        prop_assert_eq!(crops, &["wheat", "maize", "rice", "potato", "tomato", "beans"]);
        prop_assert_eq!(crops.len(), 6);
    }

    /// Surrounding text and casing never change the match
    #[test]
    fn prop_embedded_region_key_matches(prefix in "[0-9 ]{0,10}", uppercase in any::<bool>()) {
        let key = if uppercase { "COLOMBIA".to_string() } else { "colombia".to_string() };
        let location = format!("{}{}", prefix, key);
        prop_assert_eq!(crops_for(&location), crops_for("colombia"));
    }
}

// ============================================================================
// History reshaping and first-turn detection
// ============================================================================

fn message_strategy() -> impl Strategy<Value = ChatMessage> {
    ("[a-zA-Z0-9 ]{0,40}", any::<bool>()).prop_map(|(content, is_user)| ChatMessage {
        role: if is_user {
            ChatRole::User
        } else {
            ChatRole::Assistant
        },
        content,
    })
}

proptest! {
    /// A leading assistant turn is always dropped; everything else survives
    #[test]
    fn prop_history_drops_only_the_leading_assistant_turn(
        prior in proptest::collection::vec(message_strategy(), 0..8)
    ) {
        let history = build_history(&prior);

        let dropped = matches!(prior.first(), Some(m) if m.role == ChatRole::Assistant);
        let expected_len = if dropped { prior.len() - 1 } else { prior.len() };
        prop_assert_eq!(history.len(), expected_len);

        // Relative order of surviving turns is preserved
        let expected: Vec<&str> = prior
            .iter()
            .enumerate()
            .filter(|(i, m)| m.role == ChatRole::User || *i > 0)
            .map(|(_, m)| m.content.as_str())
            .collect();
        let actual: Vec<&str> = history.iter().map(|c| c.parts[0].text.as_str()).collect();
        prop_assert_eq!(actual, expected);
    }

    /// First-exchange classification depends only on length
    #[test]
    fn prop_first_exchange_is_length_based(
        prior in proptest::collection::vec(message_strategy(), 0..6)
    ) {
        prop_assert_eq!(is_first_exchange(&prior), prior.len() <= 1);
    }

    /// The parameter block is embedded verbatim in the context
    #[test]
    fn prop_water_context_embeds_parameters(params in "[a-zA-Z0-9:. \n]{1,60}") {
        prop_assume!(!params.trim().is_empty());
        let context = water_context(&params);
        prop_assert!(context.contains(&params));
    }
}
