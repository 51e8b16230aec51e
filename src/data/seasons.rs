use crate::shared::*;

/// The default four-season cycle.
///
///   Spring: plant; entering it wipes the whole grid
///   Summer: water and feed
///   Fall:   harvest; entering it forces every crop to maturity
///   Winter: sell
pub fn default_season_cycle() -> Vec<SeasonRule> {
    vec![
        SeasonRule {
            season: Season::Spring,
            actions: vec![FarmAction::Plant],
            on_enter: SeasonTransition::ResetGrid,
        },
        SeasonRule {
            season: Season::Summer,
            actions: vec![FarmAction::Water, FarmAction::Feed],
            on_enter: SeasonTransition::None,
        },
        SeasonRule {
            season: Season::Fall,
            actions: vec![FarmAction::Harvest],
            on_enter: SeasonTransition::ForceGrowth,
        },
        SeasonRule {
            season: Season::Winter,
            actions: vec![FarmAction::Sell],
            on_enter: SeasonTransition::None,
        },
    ]
}
