use rvstruct::ValueStruct;

/// Plate string as the registry expects it: uppercase, no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, ValueStruct)]
pub struct RegistrationNumber(String);

impl RegistrationNumber {
    pub fn from_plate(plate: &str) -> Self {
        RegistrationNumber(normalize_plate(plate))
    }
}

#[derive(Debug, Clone, ValueStruct)]
pub struct RegistryApiKey(String);

pub fn normalize_plate(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}
