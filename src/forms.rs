//! Typed form inputs
//!
//! Browsers submit urlencoded pairs, possibly with repeated keys (the
//! multi-select `genres` field). Handlers wrap them in [`FormFields`] and
//! parse them into one of the `*Input` structs below; the repositories only
//! ever see validated inputs.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use url::Url;

use crate::db::entities::{artist, venue, Genres};

pub const GENRE_CHOICES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

pub const STATE_CHOICES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Accepted layouts for naive start times, interpreted as UTC.
const START_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found in one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|e| e.message.clone()).collect()
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw submitted form, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.push((key.to_string(), value.into()));
        self
    }

    fn with_opt(self, key: &str, value: Option<&String>) -> Self {
        match value {
            Some(v) => self.with(key, v.as_str()),
            None => self,
        }
    }

    /// First non-blank value for `key`, trimmed.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
    }

    /// Every non-blank value for `key`, trimmed.
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .collect()
    }

    /// Checkbox semantics: present with `y`, `on` or `true`.
    pub fn checked(&self, key: &str) -> bool {
        matches!(
            self.value(key).map(str::to_ascii_lowercase).as_deref(),
            Some("y" | "yes" | "on" | "true")
        )
    }

    fn required(&self, errors: &mut ValidationErrors, key: &'static str, label: &str) -> String {
        match self.value(key) {
            Some(v) => v.to_string(),
            None => {
                errors.push(key, format!("{} is required", label));
                String::new()
            }
        }
    }

    fn optional(&self, key: &str) -> Option<String> {
        self.value(key).map(str::to_string)
    }

    fn state(&self, errors: &mut ValidationErrors) -> String {
        match self.value("state") {
            None => {
                errors.push("state", "State is required");
                String::new()
            }
            Some(v) => {
                let code = v.to_ascii_uppercase();
                if !STATE_CHOICES.contains(&code.as_str()) {
                    errors.push("state", format!("'{}' is not a valid state", v));
                }
                code
            }
        }
    }

    fn url(&self, errors: &mut ValidationErrors, key: &'static str, label: &str) -> Option<String> {
        let raw = self.value(key)?;
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
                Some(raw.to_string())
            }
            _ => {
                errors.push(key, format!("{} must be a valid http(s) URL", label));
                None
            }
        }
    }

    fn phone(&self, errors: &mut ValidationErrors) -> Option<String> {
        let raw = self.value("phone")?;
        let allowed = |c: char| c.is_ascii_digit() || " +-().".contains(c);
        if !raw.chars().all(allowed) || !raw.chars().any(|c| c.is_ascii_digit()) {
            errors.push("phone", "Phone may only contain digits, spaces and + - ( ) .");
            return None;
        }
        Some(raw.to_string())
    }

    fn genres(&self, errors: &mut ValidationErrors, required: bool) -> Genres {
        let mut genres: Vec<String> = Vec::new();
        for genre in self.values("genres") {
            if !GENRE_CHOICES.contains(&genre) {
                errors.push("genres", format!("'{}' is not a recognised genre", genre));
            } else if !genres.iter().any(|g| g == genre) {
                genres.push(genre.to_string());
            }
        }
        if required && genres.is_empty() && !errors.has_field("genres") {
            errors.push("genres", "Pick at least one genre");
        }
        Genres(genres)
    }
}

impl From<Vec<(String, String)>> for FormFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

impl From<&venue::Model> for FormFields {
    fn from(venue: &venue::Model) -> Self {
        let mut fields = FormFields::new()
            .with("name", venue.name.as_str())
            .with("city", venue.city.as_str())
            .with("state", venue.state.as_str())
            .with_opt("address", venue.address.as_ref())
            .with_opt("phone", venue.phone.as_ref())
            .with_opt("image_link", venue.image_link.as_ref())
            .with_opt("facebook_link", venue.facebook_link.as_ref())
            .with_opt("website", venue.website.as_ref())
            .with_opt("seeking_description", venue.seeking_description.as_ref());
        if venue.seeking_talent {
            fields = fields.with("seeking_talent", "y");
        }
        for genre in venue.genres.iter() {
            fields = fields.with("genres", genre.as_str());
        }
        fields
    }
}

impl From<&artist::Model> for FormFields {
    fn from(artist: &artist::Model) -> Self {
        let mut fields = FormFields::new()
            .with("name", artist.name.as_str())
            .with("city", artist.city.as_str())
            .with("state", artist.state.as_str())
            .with_opt("phone", artist.phone.as_ref())
            .with_opt("image_link", artist.image_link.as_ref())
            .with_opt("facebook_link", artist.facebook_link.as_ref())
            .with_opt("website", artist.website.as_ref())
            .with_opt("seeking_description", artist.seeking_description.as_ref());
        if artist.seeking_venue {
            fields = fields.with("seeking_venue", "y");
        }
        for genre in artist.genres.iter() {
            fields = fields.with("genres", genre.as_str());
        }
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: Genres,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl VenueInput {
    pub fn parse(fields: &FormFields) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = fields.required(&mut errors, "name", "Name");
        let city = fields.required(&mut errors, "city", "City");
        let state = fields.state(&mut errors);
        let phone = fields.phone(&mut errors);
        let genres = fields.genres(&mut errors, true);
        let image_link = fields.url(&mut errors, "image_link", "Image link");
        let facebook_link = fields.url(&mut errors, "facebook_link", "Facebook link");
        let website = fields.url(&mut errors, "website", "Website");
        let seeking_talent = fields.checked("seeking_talent");
        let seeking_description = if seeking_talent {
            fields.optional("seeking_description")
        } else {
            None
        };

        errors.finish(Self {
            name,
            city,
            state,
            address: fields.optional("address"),
            phone,
            genres,
            image_link,
            facebook_link,
            website,
            seeking_talent,
            seeking_description,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Genres,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistInput {
    pub fn parse(fields: &FormFields) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = fields.required(&mut errors, "name", "Name");
        let city = fields.required(&mut errors, "city", "City");
        let state = fields.state(&mut errors);
        let phone = fields.phone(&mut errors);
        let genres = fields.genres(&mut errors, false);
        let image_link = fields.url(&mut errors, "image_link", "Image link");
        let facebook_link = fields.url(&mut errors, "facebook_link", "Facebook link");
        let website = fields.url(&mut errors, "website", "Website");
        let seeking_venue = fields.checked("seeking_venue");
        let seeking_description = if seeking_venue {
            fields.optional("seeking_description")
        } else {
            None
        };

        errors.finish(Self {
            name,
            city,
            state,
            phone,
            genres,
            image_link,
            facebook_link,
            website,
            seeking_venue,
            seeking_description,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowInput {
    pub venue_id: i32,
    pub artist_id: i32,
    pub start_time: DateTime<FixedOffset>,
}

impl ShowInput {
    pub fn parse(fields: &FormFields) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let venue_id = parse_id(fields, &mut errors, "venue_id", "Venue");
        let artist_id = parse_id(fields, &mut errors, "artist_id", "Artist");
        let start_time = match fields.value("start_time") {
            None => {
                errors.push("start_time", "Start time is required");
                None
            }
            Some(raw) => {
                let parsed = parse_start_time(raw);
                if parsed.is_none() {
                    errors.push("start_time", format!("'{}' is not a valid start time", raw));
                }
                parsed
            }
        };

        match (venue_id, artist_id, start_time) {
            (Some(venue_id), Some(artist_id), Some(start_time)) if errors.is_empty() => Ok(Self {
                venue_id,
                artist_id,
                start_time: start_time.fixed_offset(),
            }),
            _ => Err(errors),
        }
    }
}

fn parse_id(
    fields: &FormFields,
    errors: &mut ValidationErrors,
    key: &'static str,
    label: &str,
) -> Option<i32> {
    match fields.value(key).map(str::parse::<i32>) {
        Some(Ok(id)) if id > 0 => Some(id),
        Some(_) => {
            errors.push(key, format!("{} ID must be a positive whole number", label));
            None
        }
        None => {
            errors.push(key, format!("{} ID is required", label));
            None
        }
    }
}

/// Parse a submitted start time and normalise it to UTC.
pub fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    START_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
