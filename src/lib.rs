pub mod app;

pub mod shared {
    pub mod app;
    pub mod handlers {
        pub mod postgres_handler;
    }
    pub mod types {
        pub mod account;
        pub mod app;
    }
    pub mod util {
        pub mod config;
    }
}

pub mod jobs {
    pub mod app;
    pub mod board;
    pub mod client;
    pub mod filter;
    pub mod logo;
    pub mod reconcile;
    pub mod store;
    pub mod handlers {
        pub mod postgres_handler;
    }
    pub mod types {
        pub mod api;
        pub mod job;
        pub mod stats;
    }
}
