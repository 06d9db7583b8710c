//! Per-country safety snapshots.
//!
//! Nothing here is persisted: a [`SafetyProvider`] computes a fresh
//! [`SafetyInfo`] per request. [`StaticSafetyTable`] serves a fixed table and
//! falls back to international guidance for unknown countries.

use chrono::Utc;
use shared::{EmergencyNumber, EmergencyService, SafetyInfo};

pub trait SafetyProvider: Send + Sync {
    /// `location` is free text shown back to the client (usually a trip
    /// destination); `country` selects the table entry.
    fn lookup(&self, country: Option<&str>, location: Option<&str>) -> SafetyInfo;
}

struct CountryEntry {
    country: &'static str,
    aliases: &'static [&'static str],
    warnings: &'static [&'static str],
    numbers: &'static [(EmergencyService, &'static str, &'static str)],
    health_info: &'static str,
}

const COUNTRIES: &[CountryEntry] = &[
    CountryEntry {
        country: "Japan",
        aliases: &["jp"],
        warnings: &[
            "Japan is generally very safe, but be aware of earthquakes and typhoons.",
            "Keep your passport secure at all times.",
            "Be cautious in crowded areas to avoid pickpockets.",
        ],
        numbers: &[
            (EmergencyService::Police, "110", "Police emergency"),
            (EmergencyService::Ambulance, "119", "Fire and ambulance"),
            (EmergencyService::Embassy, "+81-3-3224-5000", "US Embassy Tokyo"),
        ],
        health_info: "Japan has excellent healthcare. Tap water is safe to drink. No special vaccinations required.",
    },
    CountryEntry {
        country: "France",
        aliases: &["fr"],
        warnings: &[
            "Pickpocketing is common around major tourist sites and on the metro.",
            "Strikes can disrupt public transport at short notice.",
        ],
        numbers: &[
            (EmergencyService::Police, "17", "Police"),
            (EmergencyService::Ambulance, "15", "SAMU medical emergencies"),
            (EmergencyService::Fire, "18", "Fire brigade"),
            (EmergencyService::Other, "112", "European emergency number"),
        ],
        health_info: "High standard of healthcare. Carry a European Health Insurance Card or travel insurance.",
    },
    CountryEntry {
        country: "United States",
        aliases: &["usa", "us", "united states of america"],
        warnings: &[
            "Check local weather alerts during hurricane and wildfire seasons.",
            "Medical care is expensive; travel insurance is strongly recommended.",
        ],
        numbers: &[(EmergencyService::Police, "911", "Police, fire and ambulance")],
        health_info: "Healthcare is excellent but costly. Tap water is safe to drink in most areas.",
    },
    CountryEntry {
        country: "United Kingdom",
        aliases: &["uk", "england", "scotland", "wales", "great britain"],
        warnings: &["Watch for pickpockets in busy city centres and on public transport."],
        numbers: &[
            (EmergencyService::Police, "999", "Police, fire and ambulance"),
            (EmergencyService::Other, "111", "NHS non-emergency medical advice"),
        ],
        health_info: "Emergency treatment is available through the NHS. Tap water is safe to drink.",
    },
    CountryEntry {
        country: "Thailand",
        aliases: &["th"],
        warnings: &[
            "Be wary of gem and tuk-tuk scams around tourist areas.",
            "Road traffic accidents are common; wear a helmet on scooters.",
        ],
        numbers: &[
            (EmergencyService::Police, "191", "Police"),
            (EmergencyService::Ambulance, "1669", "Medical emergencies"),
            (EmergencyService::Other, "1155", "Tourist police"),
        ],
        health_info: "Drink bottled water. Consult a travel clinic about vaccinations before departure.",
    },
];

const INTERNATIONAL: CountryEntry = CountryEntry {
    country: "International",
    aliases: &[],
    warnings: &[
        "Stay aware of your surroundings.",
        "Keep valuables secure.",
        "Avoid isolated areas after dark.",
    ],
    numbers: &[(
        EmergencyService::Other,
        "112",
        "International emergency number (works on most mobile networks)",
    )],
    health_info: "Check local health advisories and carry travel insurance.",
};

#[derive(Debug, Default, Clone, Copy)]
pub struct StaticSafetyTable;

impl StaticSafetyTable {
    fn entry(country: &str) -> &'static CountryEntry {
        let wanted = country.trim().to_lowercase();
        COUNTRIES
            .iter()
            .find(|entry| {
                entry.country.to_lowercase() == wanted
                    || entry.aliases.iter().any(|alias| *alias == wanted)
            })
            .unwrap_or(&INTERNATIONAL)
    }
}

impl SafetyProvider for StaticSafetyTable {
    fn lookup(&self, country: Option<&str>, location: Option<&str>) -> SafetyInfo {
        let entry = country.map_or(&INTERNATIONAL, Self::entry);

        SafetyInfo {
            country: entry.country.to_string(),
            location: location.map(str::to_string),
            warnings: entry.warnings.iter().map(|w| w.to_string()).collect(),
            emergency_numbers: entry
                .numbers
                .iter()
                .map(|(service, number, description)| EmergencyNumber {
                    service: *service,
                    number: number.to_string(),
                    description: Some(description.to_string()),
                })
                .collect(),
            health_info: Some(entry.health_info.to_string()),
            updated_at: Utc::now(),
        }
    }
}

/// The country part of a destination such as `"Tokyo, Japan"`.
pub fn country_from_destination(destination: &str) -> &str {
    destination.rsplit(',').next().unwrap_or(destination).trim()
}
