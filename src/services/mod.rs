//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: agregados
//! derivados (calendario, dashboard, reportes) y los flujos de escritura
//! (vehículos, cuentas).

pub mod auth_service;
pub mod booking_service;
pub mod calendar_service;
pub mod dashboard_service;
pub mod jwt_service;
pub mod report_service;
pub mod vehicle_service;

pub use auth_service::AuthService;
pub use booking_service::BookingService;
pub use calendar_service::CalendarService;
pub use dashboard_service::DashboardService;
pub use report_service::ReportService;
pub use vehicle_service::VehicleService;
