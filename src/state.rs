use std::sync::Arc;

use crate::config::Config;
use crate::email::Mailer;
use crate::leads::LeadLog;
use crate::rate_limit::FixedWindowLimiter;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub mailer: Arc<dyn Mailer>,
    pub lead_log: LeadLog,
    pub quote_limiter: FixedWindowLimiter,
    pub lead_limiter: FixedWindowLimiter,
}
