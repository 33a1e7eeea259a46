//! Wire model of the user API and its flattened record form
//!
//! The API nests names and pictures; the directory flattens each result into
//! a [`User`] so categories like `firstname` resolve at the top level.

use roster_core::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Full API response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult {
    /// Users of the requested page
    pub results: Vec<UserResult>,
    /// Echo of the request parameters
    pub info: Info,
}

/// Request echo returned with every page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// Seed the page was generated from
    pub seed: String,
    /// Number of results requested
    pub results: u32,
    /// Page number
    pub page: u32,
}

/// Person's name parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    /// Honorific
    #[serde(default)]
    pub title: String,
    /// Given name
    pub first: String,
    /// Family name
    pub last: String,
}

/// Portrait URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    /// Medium size portrait
    pub medium: String,
    /// Large size portrait
    #[serde(default)]
    pub large: String,
    /// Thumbnail
    #[serde(default)]
    pub thumbnail: String,
}

/// Street part of an address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Street {
    /// House number
    pub number: i64,
    /// Street name
    pub name: String,
}

/// Postal code, textual or numeric depending on the country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Postcode {
    /// Numeric postal code
    Number(i64),
    /// Textual postal code
    Text(String),
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Geographic coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude
    pub latitude: String,
    /// Longitude
    pub longitude: String,
}

/// Time zone of an address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timezone {
    /// UTC offset
    pub offset: String,
    /// Human readable zone
    pub description: String,
}

/// Postal address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Street
    pub street: Street,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Country
    pub country: String,
    /// Postal code
    pub postcode: Postcode,
    /// Coordinates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Time zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<Timezone>,
}

/// Account identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Login {
    /// Stable account id
    pub uuid: String,
    /// Username
    pub username: String,
}

/// Birth date and derived age
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOfBirth {
    /// ISO-8601 timestamp
    pub date: String,
    /// Age in years
    pub age: u32,
}

/// One user as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResult {
    /// Name parts
    pub name: Name,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Portraits
    pub picture: Picture,
    /// Nationality code
    pub nat: String,
    /// Gender
    #[serde(default)]
    pub gender: Option<String>,
    /// Account identifiers
    pub login: Login,
    /// Address
    pub location: Location,
    /// Birth date
    pub dob: DateOfBirth,
}

/// Flattened user as grouped and displayed by the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Given name
    pub firstname: String,
    /// Family name
    pub lastname: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Medium portrait URL
    pub image: String,
    /// Nationality code
    pub nat: String,
    /// Gender
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Account identifiers
    pub login: Login,
    /// Address
    pub location: Location,
    /// Birth date
    pub dob: DateOfBirth,
    /// Position within the page it was fetched with
    pub index: usize,
}

impl User {
    /// Flatten API results, numbering users by page position
    #[must_use]
    pub fn from_results(results: Vec<UserResult>) -> Vec<Self> {
        results
            .into_iter()
            .enumerate()
            .map(|(index, user)| Self {
                firstname: user.name.first,
                lastname: user.name.last,
                email: user.email,
                phone: user.phone,
                image: user.picture.medium,
                nat: user.nat,
                gender: user.gender,
                login: user.login,
                location: user.location,
                dob: user.dob,
                index,
            })
            .collect()
    }

    /// `first last`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    /// Portrait URL with the account id appended so browsers do not reuse
    /// another user's cached image
    #[must_use]
    pub fn image_src(&self) -> String {
        format!("{}?id={}", self.image, self.login.uuid)
    }

    /// One-line postal address
    #[must_use]
    pub fn formatted_address(&self) -> String {
        let Location {
            street,
            city,
            state,
            country,
            postcode,
            ..
        } = &self.location;
        format!(
            "{} {}, {city}, {state}, {country} {postcode}",
            street.number, street.name
        )
    }

    /// Record form used by the grouping engine
    ///
    /// # Errors
    /// Propagates the serializer error; cannot happen for well-formed users.
    pub fn to_record(&self) -> Result<Record, serde_json::Error> {
        Record::from_serialize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roster_core::{resolve_key, Category};

    const SAMPLE: &str = r#"{
        "results": [{
            "gender": "female",
            "name": {"title": "Mrs", "first": "Marisela", "last": "Fonseca"},
            "location": {
                "street": {"number": 8003, "name": "Peatonal Rosales"},
                "city": "Las Vigas", "state": "Guerrero", "country": "Mexico",
                "postcode": 25269,
                "coordinates": {"latitude": "28.0796", "longitude": "124.2176"},
                "timezone": {"offset": "+5:00", "description": "Ekaterinburg, Islamabad, Karachi, Tashkent"}
            },
            "email": "marisela.fonseca@example.com",
            "login": {"uuid": "a56acc76-24b8-413d-aa94-cf200ab6c8c3", "username": "crazyrabbit958", "password": "merlot"},
            "dob": {"date": "1954-07-06T23:54:44.130Z", "age": 69},
            "phone": "(667) 475 7275",
            "picture": {"large": "l.jpg", "medium": "https://randomuser.me/api/portraits/med/women/5.jpg", "thumbnail": "t.jpg"},
            "nat": "MX"
        }],
        "info": {"seed": "awork", "results": 1, "page": 1}
    }"#;

    fn sample_user() -> User {
        let api: ApiResult = serde_json::from_str(SAMPLE).unwrap();
        User::from_results(api.results).remove(0)
    }

    #[test]
    fn flattens_api_result() {
        let user = sample_user();
        assert_eq!(user.firstname, "Marisela");
        assert_eq!(user.lastname, "Fonseca");
        assert_eq!(user.nat, "MX");
        assert_eq!(user.gender.as_deref(), Some("female"));
        assert_eq!(user.index, 0);
        assert_eq!(user.full_name(), "Marisela Fonseca");
    }

    #[test]
    fn derived_display_fields() {
        let user = sample_user();
        assert_eq!(
            user.image_src(),
            "https://randomuser.me/api/portraits/med/women/5.jpg?id=a56acc76-24b8-413d-aa94-cf200ab6c8c3"
        );
        assert_eq!(
            user.formatted_address(),
            "8003 Peatonal Rosales, Las Vigas, Guerrero, Mexico 25269"
        );
    }

    #[test]
    fn record_resolves_every_category() {
        let record = sample_user().to_record().unwrap();
        let keys: Vec<String> = Category::ALL
            .iter()
            .map(|c| resolve_key(&record, &c.key_path()).to_string())
            .collect();
        assert_eq!(keys, vec!["M", "69", "female", "MX"]);
    }

    #[test]
    fn textual_postcode() {
        let code: Postcode = serde_json::from_str(r#""T2X 1V4""#).unwrap();
        assert_eq!(code.to_string(), "T2X 1V4");
    }
}
