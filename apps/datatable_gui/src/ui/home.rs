use client_core::catalog::endpoint_path;
use eframe::egui;
use shared::domain::TableKind;
use url::Url;

const SAMPLE_DATA_URL: &str = "https://www.postgresqltutorial.com/postgresql-sample-database/";

pub fn show_home(ui: &mut egui::Ui, api_base_url: &Url) {
    ui.heading("Remote Data Tables");
    ui.add_space(6.0);
    ui.label(
        "Browse the customer and film tables of the DVD rental sample database. \
         Paging, sorting and filtering run on the server; filters are sent once \
         typing pauses.",
    );
    ui.add_space(12.0);

    ui.strong("Endpoints");
    egui::Grid::new("home_endpoints").num_columns(2).show(ui, |ui| {
        for kind in TableKind::ALL {
            ui.label(kind.title());
            ui.monospace(format!(
                "POST {}{}",
                api_base_url.as_str().trim_end_matches('/'),
                endpoint_path(kind)
            ));
            ui.end_row();
        }
    });
    ui.add_space(12.0);

    ui.horizontal(|ui| {
        ui.label("Sample data:");
        ui.hyperlink_to("PostgreSQL DVD rental database", SAMPLE_DATA_URL);
    });
    ui.small("Hold Shift while clicking a column header to sort by several columns.");
}
