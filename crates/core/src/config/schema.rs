//! Configuration schema definitions
//!
//! Every table the engine consumes at construction time. All sections carry
//! serde defaults so an empty file yields the built-in configuration.

use crate::error::{ErrorCode, Result};
use crate::validation::{ValidationResult, Validator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum candidate count that stops the fallback pipeline
    #[serde(default = "default_min_results")]
    pub min_results: i64,

    #[serde(default)]
    pub fuzzy: FuzzyConfig,

    /// Symmetric numeric margin per field name
    #[serde(default = "default_tolerances")]
    pub tolerances: BTreeMap<String, f64>,

    #[serde(default)]
    pub synonyms: SynonymConfig,

    #[serde(default)]
    pub geography: GeographyConfig,

    /// Well-known locations queried in order at the terminal level
    #[serde(default = "default_popular_locations")]
    pub popular_locations: Vec<String>,

    #[serde(default)]
    pub relaxation: RelaxationConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    /// Message template overrides keyed by level name (`exact`, `relaxed`, ...)
    #[serde(default)]
    pub messages: BTreeMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_results: default_min_results(),
            fuzzy: FuzzyConfig::default(),
            tolerances: default_tolerances(),
            synonyms: SynonymConfig::default(),
            geography: GeographyConfig::default(),
            popular_locations: default_popular_locations(),
            relaxation: RelaxationConfig::default(),
            limits: LimitsConfig::default(),
            messages: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Check structural validity of every section.
    ///
    /// Field names inside the tables are checked by the engine, which owns
    /// the field catalog.
    pub fn validate(&self) -> Result<()> {
        self.check().to_result_as(ErrorCode::ConfigValidationError)
    }

    /// Run every check and keep warnings alongside errors.
    pub fn check(&self) -> ValidationResult {
        let mut validator = Validator::new()
            .positive("min_results", self.min_results as f64)
            .range("fuzzy.threshold", self.fuzzy.threshold, f64::MIN_POSITIVE, 1.0)
            .positive("relaxation.fee_multiplier", self.relaxation.fee_multiplier)
            .non_negative("relaxation.floor_margin", self.relaxation.floor_margin)
            .non_negative("relaxation.bedroom_margin", self.relaxation.bedroom_margin)
            .range("relaxation.price_percent", self.relaxation.price_percent, 0.0, 100.0)
            .positive("limits.location_only", self.limits.location_only as f64)
            .positive("limits.popular", self.limits.popular as f64)
            .non_empty("popular_locations", &self.popular_locations)
            .warn_if(
                "fuzzy.enabled",
                !self.fuzzy.enabled && self.fuzzy.threshold != default_fuzzy_threshold(),
                "fuzzy.threshold is ignored while fuzzy matching is disabled",
            );

        for (field, tolerance) in &self.tolerances {
            validator = validator.non_negative(&format!("tolerances.{}", field), *tolerance);
        }
        for (index, location) in self.popular_locations.iter().enumerate() {
            validator = validator.required(&format!("popular_locations[{}]", index), location);
        }
        for (neighborhood, city) in &self.geography.neighborhoods {
            validator = validator
                .required("geography.neighborhoods", neighborhood)
                .required(&format!("geography.neighborhoods.{}", neighborhood), city);
        }
        for (city, members) in &self.geography.metros {
            validator = validator.non_empty(&format!("geography.metros.{}", city), members);
        }
        for (kind, table) in [("scalar", &self.synonyms.scalar), ("array", &self.synonyms.array)] {
            for (field, terms) in table {
                for (canonical, synonyms) in terms {
                    validator = validator.non_empty(
                        &format!("synonyms.{}.{}.{}", kind, field, canonical),
                        synonyms,
                    );
                }
            }
        }

        validator.validate()
    }
}

fn default_min_results() -> i64 {
    10
}

/// Fuzzy string matching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minimum normalized similarity (0, 1] accepted as a fuzzy match
    #[serde(default = "default_fuzzy_threshold")]
    pub threshold: f64,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: default_fuzzy_threshold(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_fuzzy_threshold() -> f64 {
    0.8
}

fn default_tolerances() -> BTreeMap<String, f64> {
    [
        ("bathrooms", 0.5),
        ("square_feet", 100.0),
        ("floor_level", 2.0),
        ("year_built", 5.0),
        ("max_maintenance_fee", 100.0),
        ("min_price", 25_000.0),
        ("max_price", 25_000.0),
        ("lot_size", 500.0),
        ("max_property_tax", 500.0),
        ("storeys", 1.0),
        ("max_days_on_market", 7.0),
    ]
    .into_iter()
    .map(|(field, tolerance)| (field.to_string(), tolerance))
    .collect()
}

/// Synonym tables: field name -> canonical term -> synonyms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymConfig {
    /// Tables for scalar string/enum fields
    #[serde(default = "default_scalar_synonyms")]
    pub scalar: BTreeMap<String, BTreeMap<String, Vec<String>>>,

    /// Tables for list fields, keyed by canonical item
    #[serde(default = "default_array_synonyms")]
    pub array: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl Default for SynonymConfig {
    fn default() -> Self {
        Self {
            scalar: default_scalar_synonyms(),
            array: default_array_synonyms(),
        }
    }
}

type TermTable = &'static [(&'static str, &'static [&'static str])];

fn build_tables(tables: &[(&str, TermTable)]) -> BTreeMap<String, BTreeMap<String, Vec<String>>> {
    tables
        .iter()
        .map(|(field, terms)| {
            let terms: BTreeMap<String, Vec<String>> = terms
                .iter()
                .map(|(canonical, synonyms)| {
                    (
                        canonical.to_string(),
                        synonyms.iter().map(|s| s.to_string()).collect(),
                    )
                })
                .collect();
            (field.to_string(), terms)
        })
        .collect()
}

const PROPERTY_TYPE_TERMS: TermTable = &[
    ("condo", &["condominium", "apartment", "condo apartment"]),
    ("townhouse", &["townhome", "row house", "condo townhouse"]),
    ("detached", &["house", "single family", "detached house"]),
    ("semi-detached", &["semi", "semi detached house"]),
    ("loft", &["hard loft", "soft loft"]),
];

const VIEW_TERMS: TermTable = &[
    ("lake", &["water", "waterfront", "lakefront"]),
    ("city", &["skyline", "downtown"]),
    ("park", &["green space", "ravine"]),
];

const EXPOSURE_TERMS: TermTable = &[
    ("north", &["n"]),
    ("south", &["s"]),
    ("east", &["e"]),
    ("west", &["w"]),
];

const HEATING_TYPE_TERMS: TermTable = &[
    ("forced air", &["furnace", "forced air gas"]),
    ("radiant", &["in floor", "heated floors"]),
    ("heat pump", &["ductless", "mini split"]),
];

const PARKING_TYPE_TERMS: TermTable = &[
    ("underground", &["indoor", "garage"]),
    ("surface", &["outdoor", "driveway"]),
];

const TRANSACTION_TYPE_TERMS: TermTable = &[
    ("sale", &["buy", "purchase", "for sale"]),
    ("lease", &["rent", "rental", "for rent"]),
];

const AMENITIES_TERMS: TermTable = &[
    ("gym", &["fitness center", "fitness centre", "exercise room"]),
    ("pool", &["swimming pool", "indoor pool"]),
    ("concierge", &["24 hour concierge", "doorman"]),
    ("rooftop", &["rooftop terrace", "roof deck"]),
    ("party room", &["party lounge", "entertainment room"]),
];

const APPLIANCES_TERMS: TermTable = &[
    ("washer", &["washing machine"]),
    ("dryer", &["clothes dryer"]),
    ("fridge", &["refrigerator"]),
    ("stove", &["range", "oven"]),
];

const FEATURES_TERMS: TermTable = &[
    ("hardwood", &["hardwood floors", "wood floors"]),
    ("ensuite", &["ensuite bathroom", "en suite"]),
];

const NEARBY_PLACES_TERMS: TermTable = &[
    ("subway", &["metro", "ttc", "skytrain"]),
    ("school", &["schools", "elementary school"]),
];

fn default_scalar_synonyms() -> BTreeMap<String, BTreeMap<String, Vec<String>>> {
    build_tables(&[
        ("property_type", PROPERTY_TYPE_TERMS),
        ("view", VIEW_TERMS),
        ("exposure", EXPOSURE_TERMS),
        ("heating_type", HEATING_TYPE_TERMS),
        ("parking_type", PARKING_TYPE_TERMS),
        ("transaction_type", TRANSACTION_TYPE_TERMS),
    ])
}

fn default_array_synonyms() -> BTreeMap<String, BTreeMap<String, Vec<String>>> {
    build_tables(&[
        ("amenities", AMENITIES_TERMS),
        ("appliances", APPLIANCES_TERMS),
        ("features", FEATURES_TERMS),
        ("nearby_places", NEARBY_PLACES_TERMS),
    ])
}

/// Geographic hierarchy tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeographyConfig {
    /// Neighborhood -> parent city
    #[serde(default = "default_neighborhoods")]
    pub neighborhoods: BTreeMap<String, String>,

    /// City -> metro-area cities, in priority order
    #[serde(default = "default_metros")]
    pub metros: BTreeMap<String, Vec<String>>,
}

impl Default for GeographyConfig {
    fn default() -> Self {
        Self {
            neighborhoods: default_neighborhoods(),
            metros: default_metros(),
        }
    }
}

fn default_neighborhoods() -> BTreeMap<String, String> {
    [
        ("Yorkville", "Toronto"),
        ("The Annex", "Toronto"),
        ("Liberty Village", "Toronto"),
        ("Leslieville", "Toronto"),
        ("Distillery District", "Toronto"),
        ("King West", "Toronto"),
        ("Kitsilano", "Vancouver"),
        ("Yaletown", "Vancouver"),
        ("Gastown", "Vancouver"),
        ("Coal Harbour", "Vancouver"),
        ("Plateau Mont-Royal", "Montreal"),
        ("Westmount", "Montreal"),
        ("Griffintown", "Montreal"),
        ("Beltline", "Calgary"),
        ("Mission", "Calgary"),
        ("The Glebe", "Ottawa"),
        ("ByWard Market", "Ottawa"),
        ("Westboro", "Ottawa"),
    ]
    .into_iter()
    .map(|(neighborhood, city)| (neighborhood.to_string(), city.to_string()))
    .collect()
}

fn default_metros() -> BTreeMap<String, Vec<String>> {
    let metros: [(&str, &[&str]); 5] = [
        (
            "Toronto",
            &[
                "Toronto",
                "Mississauga",
                "Brampton",
                "Markham",
                "Vaughan",
                "Richmond Hill",
                "Oakville",
            ],
        ),
        ("Vancouver", &["Vancouver", "Burnaby", "Richmond", "Surrey", "North Vancouver"]),
        ("Montreal", &["Montreal", "Laval", "Longueuil"]),
        ("Calgary", &["Calgary", "Airdrie", "Cochrane"]),
        ("Ottawa", &["Ottawa", "Gatineau", "Kanata"]),
    ];
    metros
        .into_iter()
        .map(|(city, members)| {
            (city.to_string(), members.iter().map(|m| m.to_string()).collect())
        })
        .collect()
}

fn default_popular_locations() -> Vec<String> {
    ["Toronto", "Vancouver", "Montreal", "Calgary", "Ottawa"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Margins applied while relaxing criteria
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelaxationConfig {
    /// Floors added on both sides of a floor-level target
    #[serde(default = "default_floor_margin")]
    pub floor_margin: f64,

    /// Multiplier applied to the maintenance-fee ceiling
    #[serde(default = "default_fee_multiplier")]
    pub fee_multiplier: f64,

    /// Bedrooms added on both sides of a bedroom target
    #[serde(default = "default_bedroom_margin")]
    pub bedroom_margin: f64,

    /// Percentage by which price bounds are widened
    #[serde(default = "default_price_percent")]
    pub price_percent: f64,
}

impl Default for RelaxationConfig {
    fn default() -> Self {
        Self {
            floor_margin: default_floor_margin(),
            fee_multiplier: default_fee_multiplier(),
            bedroom_margin: default_bedroom_margin(),
            price_percent: default_price_percent(),
        }
    }
}

fn default_floor_margin() -> f64 {
    2.0
}

fn default_fee_multiplier() -> f64 {
    1.2
}

fn default_bedroom_margin() -> f64 {
    1.0
}

fn default_price_percent() -> f64 {
    10.0
}

/// Result caps for the broad levels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_location_only_cap")]
    pub location_only: usize,

    #[serde(default = "default_popular_cap")]
    pub popular: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            location_only: default_location_only_cap(),
            popular: default_popular_cap(),
        }
    }
}

fn default_location_only_cap() -> usize {
    20
}

fn default_popular_cap() -> usize {
    10
}
