pub(crate) mod admin;
pub(crate) mod gallery;
pub(crate) mod guard;
pub(crate) mod login;
pub(crate) mod nav;
pub(crate) mod toast;
