//! habitual habit tracker - integration test support.
//!
//! This crate re-exports the workspace crates so integration tests can use
//! `habitual_test::` paths.

pub mod component {
    pub use habitual_core::{constants, error as core_error, types};
    pub use habitual_service::{auth, error, group, habit, profile};

    // Re-export db crate with all its public modules
    pub mod db {
        pub use habitual_db::db::*;

        // Additional db handlers from app
        pub mod connection {
            pub use habitual_app::db_handler::DbProviderHandler;
            pub use habitual_db::db::connection::*;
        }
    }

    pub mod model {
        pub use habitual_db::model::*;
    }

    pub mod middleware {
        pub use habitual_app::middleware::*;
    }

    // Re-export config from both core and app
    pub mod config {
        pub use habitual_app::config::ConfigHandler;
        pub use habitual_core::config::*;
    }
}

pub mod app {
    pub use habitual_app::*;

    pub mod api {
        pub use habitual_app::app::api::*;
    }
}
