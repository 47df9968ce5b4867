//! Gear checklist rule engine (spec.md §4.5).
//!
//! Composition: a static base set per activity, then conditional rules that
//! may add new items or upgrade an existing optional item to required.
//! Item identity is the `item` string; the final list is deduplicated and
//! sorted required-first, then by category, then alphabetically.

use std::collections::HashMap;

use crate::domain::checklist::ChecklistCategory as Cat;
use crate::domain::request::Activity;
use crate::domain::{ChecklistItem, Terrain};
use crate::scoring::risk::apparent_temperature;

struct Builder {
    items: HashMap<String, ChecklistItem>,
}

impl Builder {
    fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// Insert an item, or upgrade it to required if a later rule demands it
    /// (spec.md §4.5 step 3).
    fn add(&mut self, item: ChecklistItem) {
        match self.items.get_mut(&item.item) {
            Some(existing) if item.required && !existing.required => {
                existing.required = true;
                existing.reason = item.reason;
            }
            Some(_) => {}
            None => {
                self.items.insert(item.item.clone(), item);
            }
        }
    }

    fn finish(self) -> Vec<ChecklistItem> {
        let mut items: Vec<ChecklistItem> = self.items.into_values().collect();
        items.sort_by(|a, b| {
            b.required
                .cmp(&a.required)
                .then(a.category.cmp(&b.category))
                .then(a.item.cmp(&b.item))
        });
        items
    }
}

fn base_items(activity: Activity) -> Vec<ChecklistItem> {
    let i = ChecklistItem::new;
    match activity {
        Activity::Hiking => vec![
            i("Hiking boots", true, "Ankle support and traction on trail terrain", Cat::Clothing),
            i("Water (2L)", true, "Minimum hydration for a multi-hour hike", Cat::Hydration),
            i("Map and compass or GPS", true, "Navigation on unmarked trail sections", Cat::Navigation),
            i("First aid kit", true, "Basic injury treatment", Cat::Safety),
            i("Trekking poles", false, "Reduces joint strain on descents", Cat::Clothing),
        ],
        Activity::TrailRunning => vec![
            i("Trail running shoes", true, "Grip and protection at running pace", Cat::Clothing),
            i("Hydration vest", true, "Hands-free water carry at pace", Cat::Hydration),
            i("Moisture-wicking shirt", false, "Comfort over a sustained effort", Cat::Clothing),
            i("ID and emergency contact", true, "Identification if found incapacitated", Cat::Safety),
        ],
        Activity::Cycling => vec![
            i("Helmet", true, "Head protection, non-negotiable on a bike", Cat::Safety),
            i("Puncture repair kit", true, "Self-rescue from a flat tire", Cat::Safety),
            i("Water bottles", true, "Hydration for the ride duration", Cat::Hydration),
            i("Cycling gloves", false, "Grip and fall protection", Cat::Clothing),
        ],
        Activity::Camping => vec![
            i("Tent", true, "Shelter for the night", Cat::Shelter),
            i("Sleeping bag", true, "Rated for overnight temperatures", Cat::Shelter),
            i("Water purification", true, "Safe drinking water at camp", Cat::Hydration),
            i("Camp stove", false, "Hot food and drinks", Cat::Shelter),
        ],
        Activity::RockClimbing => vec![
            i("Climbing harness", true, "Fall protection", Cat::Safety),
            i("Helmet", true, "Protection from falling rock", Cat::Safety),
            i("Climbing shoes", true, "Precision footwork on rock", Cat::Clothing),
            i("Chalk bag", false, "Grip in hot or sweaty conditions", Cat::Clothing),
        ],
        Activity::Mountaineering => vec![
            i("Crampons", true, "Traction on snow and ice", Cat::Safety),
            i("Ice axe", true, "Self-arrest on steep snow", Cat::Safety),
            i("Mountaineering boots", true, "Rigid sole for crampon compatibility", Cat::Clothing),
            i("Rope", true, "Glacier travel and belayed sections", Cat::Safety),
            i("Altimeter watch", false, "Pace and navigation on a long ascent", Cat::Navigation),
        ],
        Activity::Generic => vec![
            i("Water (2L)", true, "Baseline hydration for any outdoor activity", Cat::Hydration),
            i("First aid kit", true, "Basic injury treatment", Cat::Safety),
            i("Sun protection", false, "Sunscreen and sunglasses", Cat::Protection),
        ],
    }
}

/// `(activity, risk, weather, elevation) -> [ChecklistItem]` (spec.md §4.5).
pub fn build(
    activity: Activity,
    aqi: u32,
    temp_c: Option<f64>,
    humidity_pct: Option<f64>,
    wind_kmh: Option<f64>,
    precip_mm: Option<f64>,
    uv_index: Option<f64>,
    terrain: Terrain,
) -> Vec<ChecklistItem> {
    let mut builder = Builder::new();
    for item in base_items(activity) {
        builder.add(item);
    }

    let apparent = match (temp_c, humidity_pct, wind_kmh) {
        (Some(t), Some(h), Some(w)) => Some(apparent_temperature(t, h, w)),
        (Some(t), _, _) => Some(t),
        _ => None,
    };

    apply_temperature_rules(&mut builder, apparent);
    apply_air_quality_rules(&mut builder, aqi);
    apply_uv_rules(&mut builder, uv_index);
    apply_wind_rules(&mut builder, wind_kmh);
    apply_precip_rules(&mut builder, precip_mm);
    apply_elevation_rules(&mut builder, terrain.elevation_m);
    apply_activity_specific_rules(&mut builder, activity, aqi, wind_kmh, apparent);

    builder.finish()
}

fn apply_temperature_rules(builder: &mut Builder, apparent: Option<f64>) {
    let Some(apparent) = apparent else { return };
    let i = ChecklistItem::new;

    if apparent >= 35.0 {
        builder.add(i("Extra water (4-6L)", true, "Heat-driven hydration demand above 35°C apparent", Cat::Hydration));
        builder.add(i("Electrolytes", false, "Replace salts lost to heavy sweating", Cat::Hydration));
        builder.add(i("Cooling towel", false, "Active cooling in extreme heat", Cat::Clothing));
        builder.add(i("Brimmed hat", false, "Shade for face and neck", Cat::Protection));
    }
    if apparent <= 10.0 {
        builder.add(i("Light jacket", false, "Insulation as apparent temperature drops", Cat::Clothing));
        builder.add(i("Base layers", false, "Moisture-wicking warmth under outer layers", Cat::Clothing));
    }
    if apparent <= -10.0 {
        builder.add(i("Insulated jacket", true, "Core warmth in extreme cold", Cat::Clothing));
        builder.add(i("Lined gloves", true, "Hand protection from frostbite", Cat::Clothing));
        builder.add(i("Balaclava", true, "Face protection from extreme cold and wind", Cat::Clothing));
        builder.add(i("Insulated boots", true, "Foot protection from frostbite", Cat::Clothing));
        builder.add(i("Emergency bivouac", true, "Shelter if forced to stop in extreme cold", Cat::Safety));
    }
}

fn apply_air_quality_rules(builder: &mut Builder, aqi: u32) {
    let i = ChecklistItem::new;
    if aqi > 150 {
        builder.add(i("N95/P100 mask", true, "Particulate filtration above unhealthy AQI", Cat::Protection));
        builder.add(i("Eye protection", false, "Reduce irritation in heavy particulate air", Cat::Protection));
    } else if aqi > 100 {
        builder.add(i("N95/P100 mask", false, "Optional filtration at elevated AQI", Cat::Protection));
    }
}

fn apply_uv_rules(builder: &mut Builder, uv_index: Option<f64>) {
    let Some(uv) = uv_index else { return };
    let i = ChecklistItem::new;

    if uv >= 11.0 {
        builder.add(i("SPF50+ sunscreen", true, "Skin protection at extreme UV", Cat::Protection));
        builder.add(i("UV sunglasses", true, "Eye protection at extreme UV", Cat::Protection));
        builder.add(i("UPF50+ clothing", true, "Fabric-level UV protection", Cat::Protection));
    } else if uv >= 8.0 {
        builder.add(i("SPF50+ sunscreen", true, "Skin protection at very high UV", Cat::Protection));
        builder.add(i("UV sunglasses", true, "Eye protection at very high UV", Cat::Protection));
        builder.add(i("Brimmed hat", true, "Shade for face and neck at very high UV", Cat::Protection));
    }
}

fn apply_wind_rules(builder: &mut Builder, wind_kmh: Option<f64>) {
    let Some(wind) = wind_kmh else { return };
    let i = ChecklistItem::new;

    if wind >= 60.0 {
        builder.add(i("Windproof shell", true, "Wind protection above 60 km/h", Cat::Clothing));
        builder.add(i("Goggles", true, "Eye protection from wind-driven debris", Cat::Protection));
    } else if (40.0..60.0).contains(&wind) {
        builder.add(i("Windproof jacket", true, "Wind protection between 40-59 km/h", Cat::Clothing));
    }
}

fn apply_precip_rules(builder: &mut Builder, precip_mm: Option<f64>) {
    let Some(precip) = precip_mm else { return };
    let i = ChecklistItem::new;

    if precip >= 50.0 {
        builder.add(i("Waterproof jacket", true, "Stay dry in heavy precipitation", Cat::Clothing));
        builder.add(i("Waterproof pants", true, "Stay dry in heavy precipitation", Cat::Clothing));
        builder.add(i("Pack cover", true, "Keep gear dry in heavy precipitation", Cat::Protection));
        builder.add(i("Dry clothes", true, "Change of clothes for after exposure", Cat::Clothing));
        builder.add(i("Waterproof boots", true, "Keep feet dry in heavy precipitation", Cat::Clothing));
    } else if (20.0..50.0).contains(&precip) {
        builder.add(i("Rain jacket", true, "Stay dry in moderate precipitation", Cat::Clothing));
        builder.add(i("Pack cover", false, "Keep gear dry in moderate precipitation", Cat::Protection));
    }
}

fn apply_elevation_rules(builder: &mut Builder, elevation_m: i32) {
    let i = ChecklistItem::new;
    if elevation_m >= 4000 {
        builder.add(i("Altitude medication", true, "Prevent acute mountain sickness above 4000m", Cat::Safety));
        builder.add(i("Pulse oximeter", false, "Monitor blood oxygen at altitude", Cat::Safety));
        builder.add(i("Extra snacks", true, "Higher caloric demand at altitude", Cat::Hydration));
    } else if (3000..4000).contains(&elevation_m) {
        builder.add(i("Altitude medication", false, "Optional acclimatization aid at moderate altitude", Cat::Safety));
    }
}

fn apply_activity_specific_rules(
    builder: &mut Builder,
    activity: Activity,
    aqi: u32,
    wind_kmh: Option<f64>,
    apparent: Option<f64>,
) {
    let i = ChecklistItem::new;

    if activity.is_aerobic() && aqi > 100 {
        builder.add(i(
            "Consider an indoor alternative",
            false,
            "Aerobic effort at elevated AQI increases pollutant uptake",
            Cat::Advisory,
        ));
    }

    if activity.is_technical()
        && let Some(wind) = wind_kmh
        && wind > 40.0
    {
        builder.add(i(
            "Consider postponing",
            false,
            "Technical movement above 40 km/h wind carries added fall risk",
            Cat::Advisory,
        ));
    }

    let extreme = apparent.is_some_and(|t| t > 32.0 || t < -5.0) || aqi > 150;
    if extreme {
        builder.add(i(
            "Emergency communication device",
            false,
            "Extreme conditions warrant a way to call for help without cell coverage",
            Cat::Safety,
        ));
    }
}
