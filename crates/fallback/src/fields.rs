//! Field catalog.
//!
//! Every supported search attribute, grouped by value kind. The wire name
//! (`as_str`) is what appears in `relaxed_constraints`, configuration tables
//! and candidate records.

use nestfind_core::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Wire name of the location field.
pub const LOCATION: &str = "location";

macro_rules! field_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every field of this kind, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(Error::unknown_field(s)),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let name = String::deserialize(deserializer)?;
                name.parse().map_err(|e: Error| serde::de::Error::custom(e.message))
            }
        }
    };
}

field_enum! {
    /// Yes/no requirements.
    BoolField {
        WheelchairAccessible => "wheelchair_accessible",
        PetsAllowed => "pets_allowed",
        SmokingAllowed => "smoking_allowed",
        Gym => "gym",
        Pool => "pool",
        Rooftop => "rooftop",
        Concierge => "concierge",
        InSuiteLaundry => "in_suite_laundry",
        Dishwasher => "dishwasher",
        AirConditioning => "air_conditioning",
        Fireplace => "fireplace",
        Elevator => "elevator",
        Doorman => "doorman",
        BikeStorage => "bike_storage",
        EvCharging => "ev_charging",
        StorageRoom => "storage_room",
        Den => "den",
        HardwoodFloors => "hardwood_floors",
        PartyRoom => "party_room",
        GuestSuite => "guest_suite",
        Sauna => "sauna",
        HotTub => "hot_tub",
        SecuritySystem => "security_system",
        Garden => "garden",
        Terrace => "terrace",
        VisitorParking => "visitor_parking",
        Furnished => "furnished",
        WalkInCloset => "walk_in_closet",
        CentralVacuum => "central_vacuum",
        Yard => "yard",
        Balcony => "balcony",
        Locker => "locker",
        Waterfront => "waterfront",
    }
}

field_enum! {
    /// Counts, prices and measurements.
    NumericField {
        Bedrooms => "bedrooms",
        Bathrooms => "bathrooms",
        MinPrice => "min_price",
        MaxPrice => "max_price",
        ParkingSpaces => "parking_spaces",
        SquareFeet => "square_feet",
        FloorLevel => "floor_level",
        MaxMaintenanceFee => "max_maintenance_fee",
        YearBuilt => "year_built",
        LotSize => "lot_size",
        MaxPropertyTax => "max_property_tax",
        Storeys => "storeys",
        Kitchens => "kitchens",
        MaxDaysOnMarket => "max_days_on_market",
    }
}

field_enum! {
    /// Scalar string/enum attributes.
    TextField {
        PropertyType => "property_type",
        View => "view",
        Exposure => "exposure",
        HeatingType => "heating_type",
        CoolingType => "cooling_type",
        ParkingType => "parking_type",
        BasementType => "basement_type",
        BuildingStyle => "building_style",
        LaundryType => "laundry_type",
        TransactionType => "transaction_type",
    }
}

field_enum! {
    /// Item lists.
    ListField {
        Amenities => "amenities",
        Appliances => "appliances",
        Features => "features",
        NearbyPlaces => "nearby_places",
    }
}

/// Value kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Location,
    Bool,
    Numeric,
    Text,
    List,
}

/// Any supported field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Location,
    Bool(BoolField),
    Numeric(NumericField),
    Text(TextField),
    List(ListField),
}

impl Field {
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Location => FieldKind::Location,
            Field::Bool(_) => FieldKind::Bool,
            Field::Numeric(_) => FieldKind::Numeric,
            Field::Text(_) => FieldKind::Text,
            Field::List(_) => FieldKind::List,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Location => LOCATION,
            Field::Bool(f) => f.as_str(),
            Field::Numeric(f) => f.as_str(),
            Field::Text(f) => f.as_str(),
            Field::List(f) => f.as_str(),
        }
    }

    /// Number of supported fields across all kinds.
    pub fn count() -> usize {
        1 + BoolField::ALL.len()
            + NumericField::ALL.len()
            + TextField::ALL.len()
            + ListField::ALL.len()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == LOCATION {
            return Ok(Field::Location);
        }
        s.parse()
            .map(Field::Bool)
            .or_else(|_| s.parse().map(Field::Numeric))
            .or_else(|_| s.parse().map(Field::Text))
            .or_else(|_| s.parse().map(Field::List))
            .map_err(|_| Error::unknown_field(s))
    }
}
