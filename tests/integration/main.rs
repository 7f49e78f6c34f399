//! Integration tests driving the services against the in-memory backend.

mod access_test;
mod favorite_test;
mod helpers;
mod ledger_test;
mod sharing_test;
