pub mod csv_adapter;
pub mod file_config_adapter;
pub mod json_graph_adapter;
pub mod synthetic_data_adapter;
pub mod text_report_adapter;
