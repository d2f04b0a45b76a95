use rocket::{Build, Rocket};
use salary_pulse::{Config, build_rocket};

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    dotenvy::dotenv().ok();

    match Config::load() {
        Ok(config) => build_rocket(config),
        Err(err) => {
            eprintln!("Failed to load configuration: {}", err);
            std::process::exit(1);
        }
    }
}
