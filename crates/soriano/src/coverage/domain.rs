use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier wrapper for portal customers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Policy lines offered through the brokerage catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyType {
    Vida,
    Hogar,
    Salud,
    Auto,
    Decesos,
    Accidentes,
    Viaje,
    Mascotas,
    Dental,
}

impl PolicyType {
    pub const ALL: [PolicyType; 9] = [
        PolicyType::Vida,
        PolicyType::Hogar,
        PolicyType::Salud,
        PolicyType::Auto,
        PolicyType::Decesos,
        PolicyType::Accidentes,
        PolicyType::Viaje,
        PolicyType::Mascotas,
        PolicyType::Dental,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            PolicyType::Vida => "VIDA",
            PolicyType::Hogar => "HOGAR",
            PolicyType::Salud => "SALUD",
            PolicyType::Auto => "AUTO",
            PolicyType::Decesos => "DECESOS",
            PolicyType::Accidentes => "ACCIDENTES",
            PolicyType::Viaje => "VIAJE",
            PolicyType::Mascotas => "MASCOTAS",
            PolicyType::Dental => "DENTAL",
        }
    }

    /// Case-insensitive lookup against the catalog codes.
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|policy| policy.code().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Set of policy lines the customer already holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingPolicies(BTreeSet<PolicyType>);

impl ExistingPolicies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, policy: PolicyType) -> bool {
        self.0.contains(&policy)
    }

    pub fn insert(&mut self, policy: PolicyType) -> bool {
        self.0.insert(policy)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PolicyType> + '_ {
        self.0.iter().copied()
    }

    /// Parses identifiers from a JSON array. Unknown codes and non-string
    /// entries are skipped; anything other than an array (or null) is rejected.
    pub fn from_value(value: &Value) -> Result<Self, InvalidInputError> {
        let entries = match value {
            Value::Null => return Ok(Self::default()),
            Value::Array(entries) => entries,
            _ => return Err(InvalidInputError::PoliciesNotArray),
        };

        let mut policies = Self::default();
        for entry in entries {
            match entry.as_str().and_then(PolicyType::parse) {
                Some(policy) => {
                    policies.insert(policy);
                }
                None => tracing::debug!(?entry, "ignoring unknown policy identifier"),
            }
        }
        Ok(policies)
    }
}

impl FromIterator<PolicyType> for ExistingPolicies {
    fn from_iter<I: IntoIterator<Item = PolicyType>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
    Partnered,
    Divorced,
    Widowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Unemployed,
    Retired,
    Student,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeBracket {
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingStatus {
    Owner,
    Mortgaged,
    Renting,
    Family,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelFrequency {
    Never,
    Occasional,
    Frequent,
}

/// Form labels arrive in either English or Spanish, with or without separators.
fn normalize_label(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|ch| match ch {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            '-' | ' ' => '_',
            other => other,
        })
        .collect()
}

impl MaritalStatus {
    fn from_label(raw: &str) -> Option<Self> {
        match normalize_label(raw).as_str() {
            "single" | "soltero" | "soltera" => Some(Self::Single),
            "married" | "casado" | "casada" => Some(Self::Married),
            "partnered" | "pareja" | "pareja_de_hecho" => Some(Self::Partnered),
            "divorced" | "divorciado" | "divorciada" => Some(Self::Divorced),
            "widowed" | "viudo" | "viuda" => Some(Self::Widowed),
            _ => None,
        }
    }
}

impl EmploymentStatus {
    fn from_label(raw: &str) -> Option<Self> {
        match normalize_label(raw).as_str() {
            "employed" | "empleado" | "asalariado" => Some(Self::Employed),
            "self_employed" | "autonomo" | "freelance" => Some(Self::SelfEmployed),
            "unemployed" | "desempleado" => Some(Self::Unemployed),
            "retired" | "jubilado" => Some(Self::Retired),
            "student" | "estudiante" => Some(Self::Student),
            _ => None,
        }
    }
}

impl IncomeBracket {
    fn from_label(raw: &str) -> Option<Self> {
        match normalize_label(raw).as_str() {
            "low" | "bajo" => Some(Self::Low),
            "medium" | "medio" => Some(Self::Medium),
            "high" | "alto" => Some(Self::High),
            "very_high" | "muy_alto" => Some(Self::VeryHigh),
            _ => None,
        }
    }
}

impl HousingStatus {
    fn from_label(raw: &str) -> Option<Self> {
        match normalize_label(raw).as_str() {
            "owner" | "propietario" | "propia" => Some(Self::Owner),
            "mortgaged" | "hipotecado" | "hipoteca" => Some(Self::Mortgaged),
            "renting" | "alquiler" | "inquilino" => Some(Self::Renting),
            "family" | "familiar" | "con_familia" => Some(Self::Family),
            _ => None,
        }
    }
}

impl TravelFrequency {
    fn from_label(raw: &str) -> Option<Self> {
        match normalize_label(raw).as_str() {
            "never" | "nunca" => Some(Self::Never),
            "occasional" | "ocasional" | "ocasionalmente" => Some(Self::Occasional),
            "frequent" | "frecuente" | "frecuentemente" => Some(Self::Frequent),
            _ => None,
        }
    }
}

/// Self-declared risk profile. Every field may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<MaritalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependents: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_dependents: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_status: Option<EmploymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income_bracket: Option<IncomeBracket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub housing_status: Option<HousingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_mortgage: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mortgage_amount: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_vehicle: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_value: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_private_health: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_frequency: Option<TravelFrequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pets: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub health_conditions: Vec<String>,
}

impl UserProfile {
    /// Builds a profile from loosely-typed form data. Only a non-object
    /// payload is an error; any field of the wrong shape reads as unknown.
    pub fn from_value(value: &Value) -> Result<Self, InvalidInputError> {
        let fields = value.as_object().ok_or(InvalidInputError::ProfileNotObject)?;

        Ok(Self {
            age: read_integer(fields, "age").filter(|age| *age <= 120).and_then(narrow),
            marital_status: read_label(fields, "maritalStatus", MaritalStatus::from_label),
            dependents: read_integer(fields, "dependents").and_then(narrow),
            has_dependents: read_flag(fields, "hasDependents"),
            employment_status: read_label(fields, "employmentStatus", EmploymentStatus::from_label),
            income_bracket: read_label(fields, "incomeBracket", IncomeBracket::from_label),
            housing_status: read_label(fields, "housingStatus", HousingStatus::from_label),
            has_mortgage: read_flag(fields, "hasMortgage"),
            mortgage_amount: read_integer(fields, "mortgageAmount").and_then(narrow),
            has_vehicle: read_flag(fields, "hasVehicle"),
            vehicle_value: read_integer(fields, "vehicleValue").and_then(narrow),
            has_private_health: read_flag(fields, "hasPrivateHealth"),
            travel_frequency: read_label(fields, "travelFrequency", TravelFrequency::from_label),
            pets: read_integer(fields, "pets").and_then(narrow),
            health_conditions: fields
                .get("healthConditions")
                .and_then(Value::as_array)
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::trim)
                        .filter(|condition| !condition.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    pub fn has_dependents(&self) -> bool {
        self.has_dependents.unwrap_or(false) || self.dependents.unwrap_or(0) > 0
    }

    pub fn has_mortgage(&self) -> bool {
        self.has_mortgage.unwrap_or(false)
            || self.mortgage_amount.unwrap_or(0) > 0
            || self.housing_status == Some(HousingStatus::Mortgaged)
    }

    pub fn owns_home(&self) -> bool {
        self.has_mortgage() || self.housing_status == Some(HousingStatus::Owner)
    }

    pub fn has_vehicle(&self) -> bool {
        self.has_vehicle.unwrap_or(false) || self.vehicle_value.unwrap_or(0) > 0
    }

    pub fn has_private_health(&self) -> bool {
        self.has_private_health.unwrap_or(false)
    }

    pub fn has_health_conditions(&self) -> bool {
        !self.health_conditions.is_empty()
    }

    pub fn is_self_employed(&self) -> bool {
        self.employment_status == Some(EmploymentStatus::SelfEmployed)
    }

    pub fn has_partner(&self) -> bool {
        matches!(
            self.marital_status,
            Some(MaritalStatus::Married | MaritalStatus::Partnered)
        )
    }

    pub fn is_high_income(&self) -> bool {
        matches!(
            self.income_bracket,
            Some(IncomeBracket::High | IncomeBracket::VeryHigh)
        )
    }

    pub fn travels_frequently(&self) -> bool {
        self.travel_frequency == Some(TravelFrequency::Frequent)
    }

    pub fn has_pets(&self) -> bool {
        self.pets.unwrap_or(0) > 0
    }

    pub fn age_at_least(&self, years: u8) -> bool {
        self.age.map(|age| age >= years).unwrap_or(false)
    }
}

fn read_flag(fields: &Map<String, Value>, key: &str) -> Option<bool> {
    match fields.get(key)? {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => match number.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(raw) => match normalize_label(raw).as_str() {
            "true" | "si" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn read_integer(fields: &Map<String, Value>, key: &str) -> Option<u64> {
    match fields.get(key)? {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|value| value.is_finite() && *value >= 0.0 && value.fract() == 0.0)
                .map(|value| value as u64)
        }),
        Value::String(raw) => raw.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn read_label<T>(
    fields: &Map<String, Value>,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    fields.get(key).and_then(Value::as_str).and_then(parse)
}

fn narrow<T: TryFrom<u64>>(value: u64) -> Option<T> {
    T::try_from(value).ok()
}

/// Raised only for structurally invalid analysis input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInputError {
    #[error("profile must be a JSON object")]
    ProfileNotObject,
    #[error("existingPolicyTypes must be an array of policy identifiers")]
    PoliciesNotArray,
    #[error("request body must be a JSON object with a profile field")]
    MissingProfile,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lenient_extraction_drops_malformed_fields() {
        let profile = UserProfile::from_value(&json!({
            "age": "47",
            "dependents": -2,
            "hasVehicle": "si",
            "hasMortgage": { "nested": true },
            "housingStatus": "Hipotecado",
            "maritalStatus": "unknown",
            "employmentStatus": "autónomo",
            "pets": 2.0,
            "healthConditions": ["asma", 4, " "],
        }))
        .expect("object profiles always parse");

        assert_eq!(profile.age, Some(47));
        assert_eq!(profile.dependents, None);
        assert_eq!(profile.has_vehicle, Some(true));
        assert_eq!(profile.has_mortgage, None);
        assert!(profile.has_mortgage());
        assert_eq!(profile.marital_status, None);
        assert_eq!(
            profile.employment_status,
            Some(EmploymentStatus::SelfEmployed)
        );
        assert_eq!(profile.pets, Some(2));
        assert_eq!(profile.health_conditions, vec!["asma".to_string()]);
    }

    #[test]
    fn rejects_non_object_profiles() {
        assert_eq!(
            UserProfile::from_value(&json!([1, 2, 3])),
            Err(InvalidInputError::ProfileNotObject)
        );
        assert_eq!(
            UserProfile::from_value(&Value::Null),
            Err(InvalidInputError::ProfileNotObject)
        );
    }

    #[test]
    fn unset_flags_read_as_false() {
        let profile = UserProfile::default();
        assert!(!profile.has_dependents());
        assert!(!profile.has_mortgage());
        assert!(!profile.owns_home());
        assert!(!profile.has_vehicle());
        assert!(!profile.age_at_least(0));
    }

    #[test]
    fn policy_identifiers_parse_case_insensitively() {
        let policies =
            ExistingPolicies::from_value(&json!(["auto", "Hogar", "SEGURO_RARO", 7, "VIDA"]))
                .expect("array parses");
        assert_eq!(policies.len(), 3);
        assert!(policies.contains(PolicyType::Auto));
        assert!(policies.contains(PolicyType::Hogar));
        assert!(policies.contains(PolicyType::Vida));

        assert_eq!(
            ExistingPolicies::from_value(&json!("AUTO")),
            Err(InvalidInputError::PoliciesNotArray)
        );
        assert!(ExistingPolicies::from_value(&Value::Null)
            .expect("null means no policies")
            .is_empty());
    }

    #[test]
    fn policy_type_serializes_as_catalog_code() {
        let encoded = serde_json::to_value(PolicyType::Accidentes).expect("serializes");
        assert_eq!(encoded, json!("ACCIDENTES"));
        for policy in PolicyType::ALL {
            assert_eq!(serde_json::to_value(policy).expect("serializes"), json!(policy.code()));
        }
    }
}
