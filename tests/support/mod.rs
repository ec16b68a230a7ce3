//! Shared factory fixtures for the integration suite.

use fixturedb::{Faker, Value};
use serde_json::json;

pub fn user_factory(faker: &Faker) -> Value {
    json!({
        "firstName": faker.first_name(),
        "lastName": faker.last_name(),
        "address": { "streetName": faker.street_name() },
        "avatar": faker.avatar_url(),
    })
}

pub fn comment_factory(faker: &Faker) -> Value {
    json!({
        "title": "He-yo",
        "content": faker.paragraph(),
        "author": { "name": "Morty" },
    })
}
