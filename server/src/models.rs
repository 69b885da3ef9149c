use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub display_name: Option<&'a str>,
    pub password_hash: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::preferences)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Preference {
    pub id: Uuid,
    pub keyword: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::preferences)]
pub struct NewPreference<'a> {
    pub user_id: Uuid,
    pub keyword: &'a str,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::saved_activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SavedActivity {
    pub id: Uuid,
    pub name: String,
    pub genre: String,
    pub location: String,
    pub weather: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::saved_activities)]
pub struct NewSavedActivity<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    pub genre: &'a str,
    pub location: &'a str,
    pub weather: &'a str,
    pub description: &'a str,
}
