mod examples_api;
mod health;
mod pages;
mod resources;
