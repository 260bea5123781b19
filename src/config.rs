use std::time::Duration;

pub struct Configuration {
    pub tick_interval: Duration,
    pub event_buffer_size: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(30),
            event_buffer_size: 60,
        }
    }
}
