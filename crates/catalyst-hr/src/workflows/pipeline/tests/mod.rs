mod common;
mod intents;
mod report;
