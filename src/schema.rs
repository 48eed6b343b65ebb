//! Column-name constants for the dashboard tables.
//! Single source of truth for the loader, the engines and the renderers.

// ── Partner columns ─────────────────────────────────────────────────────────
pub mod partner {
    pub const PARTNER_ID: &str = "Partner ID";
    pub const NAME: &str = "Name";
    pub const COUNTRY: &str = "Country";
    pub const CITY: &str = "City";
    pub const SPECIALIZATION: &str = "Specialization";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";

    pub const REQUIRED: [&str; 7] = [
        PARTNER_ID,
        NAME,
        COUNTRY,
        CITY,
        SPECIALIZATION,
        LATITUDE,
        LONGITUDE,
    ];

    /// Columns shown in the partner details table.
    pub const DETAILS: [&str; 5] = [PARTNER_ID, NAME, COUNTRY, CITY, SPECIALIZATION];
}

// ── Disease occurrence columns ──────────────────────────────────────────────
pub mod disease {
    pub const COUNTRY: &str = "Country";
    pub const DISEASE: &str = "Disease";
    pub const YEAR: &str = "Year";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
    pub const CASES: &str = "Cases";

    pub const REQUIRED: [&str; 6] = [COUNTRY, DISEASE, YEAR, LATITUDE, LONGITUDE, CASES];
}

// ── Summary output columns ──────────────────────────────────────────────────
pub mod summary {
    pub const NUMBER_OF_PARTNERS: &str = "Number of Partners";
    pub const COUNT: &str = "Count";
}

// ── Default file names ──────────────────────────────────────────────────────
pub mod files {
    pub const PARTNERS: &str = "partners_data.csv";
    pub const DISEASES: &str = "disease_data.csv";
}
