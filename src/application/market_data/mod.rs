// Market data processing modules
pub mod chart_service;
