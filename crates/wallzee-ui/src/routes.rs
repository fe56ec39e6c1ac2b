//! Route table for the single-page app.

use wallzee_core::DeviceType;
use wallzee_core::seo::PageMeta;
use yew_router::prelude::*;

/// Application routes.
#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub enum Route {
    /// Featured strip plus hero.
    #[at("/")]
    Home,
    /// Phone gallery.
    #[at("/phone-wallpapers")]
    Phone,
    /// Desktop gallery.
    #[at("/desktop-wallpapers")]
    Desktop,
    /// Admin sign-in.
    #[at("/admin/login")]
    AdminLogin,
    /// Admin statistics.
    #[at("/admin/dashboard")]
    AdminDashboard,
    /// Wallpaper management.
    #[at("/admin/wallpapers")]
    AdminWallpapers,
    /// Category management.
    #[at("/admin/categories")]
    AdminCategories,
    /// User profiles.
    #[at("/admin/users")]
    AdminUsers,
    /// Password and sign-out.
    #[at("/admin/settings")]
    AdminSettings,
    /// Anything else.
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    /// Whether the route sits behind the admin guard.
    #[must_use]
    pub const fn is_protected(&self) -> bool {
        matches!(
            self,
            Self::AdminDashboard
                | Self::AdminWallpapers
                | Self::AdminCategories
                | Self::AdminUsers
                | Self::AdminSettings
        )
    }

    /// Whether the public navbar and footer wrap the route.
    #[must_use]
    pub const fn has_public_chrome(&self) -> bool {
        matches!(self, Self::Home | Self::Phone | Self::Desktop | Self::NotFound)
    }

    /// Device partition shown by a gallery route.
    #[must_use]
    pub const fn device(&self) -> Option<DeviceType> {
        match self {
            Self::Phone => Some(DeviceType::Phone),
            Self::Desktop => Some(DeviceType::Desktop),
            _ => None,
        }
    }

    /// Gallery route for a device partition.
    #[must_use]
    pub const fn for_device(device: DeviceType) -> Self {
        match device {
            DeviceType::Phone => Self::Phone,
            DeviceType::Desktop => Self::Desktop,
        }
    }

    /// Head metadata for the route.
    #[must_use]
    pub fn meta(&self) -> PageMeta {
        let path = self.to_path();
        match self {
            Self::Home => PageMeta::new(None, None, Some(&path), &[], false),
            Self::Phone => PageMeta::new(
                Some("Phone Wallpapers"),
                Some("Browse and download free HD phone wallpapers for iPhone and Android."),
                Some(&path),
                &["phone wallpapers", "mobile backgrounds", "iPhone wallpapers", "Android wallpapers"],
                false,
            ),
            Self::Desktop => PageMeta::new(
                Some("Desktop Wallpapers"),
                Some("Browse and download free HD and 4K desktop wallpapers."),
                Some(&path),
                &["desktop wallpapers", "4K wallpapers", "PC backgrounds"],
                false,
            ),
            Self::NotFound => PageMeta::new(Some("Coming Soon"), None, Some(&path), &[], true),
            Self::AdminLogin
            | Self::AdminDashboard
            | Self::AdminWallpapers
            | Self::AdminCategories
            | Self::AdminUsers
            | Self::AdminSettings => PageMeta::new(Some("Admin"), None, Some(&path), &[], true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_match_public_urls() {
        assert_eq!(Route::Home.to_path(), "/");
        assert_eq!(Route::Phone.to_path(), "/phone-wallpapers");
        assert_eq!(Route::Desktop.to_path(), "/desktop-wallpapers");
        assert_eq!(Route::AdminSettings.to_path(), "/admin/settings");
    }

    #[test]
    fn unknown_paths_fall_through_to_not_found() {
        assert_eq!(Route::recognize("/admin/wallpapers"), Some(Route::AdminWallpapers));
        assert_eq!(Route::recognize("/about-us"), Some(Route::NotFound));
    }

    #[test]
    fn admin_routes_are_guarded_except_login() {
        assert!(!Route::AdminLogin.is_protected());
        assert!(Route::AdminDashboard.is_protected());
        assert!(!Route::Home.is_protected());
        assert!(!Route::AdminLogin.has_public_chrome());
    }

    #[test]
    fn gallery_routes_map_to_devices() {
        for device in DeviceType::all() {
            assert_eq!(Route::for_device(device).device(), Some(device));
        }
        assert_eq!(Route::Home.device(), None);
    }

    #[test]
    fn admin_pages_are_not_indexed() {
        assert_eq!(Route::AdminDashboard.meta().robots, "noindex, nofollow");
        let meta = Route::Phone.meta();
        assert!(meta.title.starts_with("Phone Wallpapers | "));
        assert_eq!(meta.canonical_url, "https://wallzee.live/phone-wallpapers");
    }
}
