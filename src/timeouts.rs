pub mod ms {
    pub const POLL_INTERVAL: u64 = 100;
    pub const UPLOAD_POLL: u64 = 500;
    pub const SETTLE: u64 = 50;
}

pub mod secs {
    /// Uniform bound for every selector wait and navigation in a session.
    pub const STEP: u64 = 30;
    /// Bound for the photo-upload completion poll.
    pub const UPLOAD: u64 = 60;
    pub const REQUEST: u64 = 120;
}
