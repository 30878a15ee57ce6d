mod auth;
mod predict;
