use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PostPerson {
    pub name: Option<String>,
    pub number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PutPerson {
    pub name: Option<String>,
    pub number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostNote {
    pub content: Option<String>,
    pub important: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PutNote {
    pub content: Option<String>,
    pub important: Option<bool>,
}
