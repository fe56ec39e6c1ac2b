pub(crate) mod account;
pub(crate) mod browse;
pub(crate) mod categories;
pub(crate) mod users;
pub(crate) mod wallpapers;
