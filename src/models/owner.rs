use crate::domain::OwnerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: OwnerId,
    pub email: String,
    pub channel_id: Option<String>,
    pub channel_name: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewOwner {
    pub email: String,
    pub channel_id: Option<String>,
    pub channel_name: Option<String>,
}
