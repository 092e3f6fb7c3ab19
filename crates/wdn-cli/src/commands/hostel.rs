use anyhow::Context;
use serde_json::json;

use wdn_core::enums::GenderPolicy;
use wdn_db::repos::hostel::NewRoom;
use wdn_db::service::WdnService;

use crate::cli::{HostelCommands, OutputFormat};
use crate::commands::parse_variant;
use crate::output;

pub async fn handle(
    action: HostelCommands,
    service: &WdnService,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        HostelCommands::Create {
            name,
            location,
            warden,
            gender,
            rooms,
        } => {
            let gender: GenderPolicy = parse_variant(&gender)?;
            let rooms = parse_rooms(&rooms)?;
            let (hostel, created) = service
                .create_hostel(&name, &location, &warden, gender, &rooms)
                .await?;
            output::output(&json!({ "hostel": hostel, "rooms": created }), format)
        }
        HostelCommands::List => {
            let hostels = service.list_hostels().await?;
            output::output(&hostels, format)
        }
        HostelCommands::Delete { id } => {
            service.delete_hostel(&id).await?;
            output::output(&json!({ "deleted": id }), format)
        }
    }
}

fn parse_rooms(raw: &[String]) -> anyhow::Result<Vec<NewRoom>> {
    raw.iter()
        .map(|entry| {
            let (number, capacity) = entry
                .split_once(':')
                .with_context(|| format!("invalid room '{entry}', expected NUMBER:CAPACITY"))?;
            let capacity: i64 = capacity
                .parse()
                .with_context(|| format!("invalid capacity in '{entry}'"))?;
            anyhow::ensure!(capacity > 0, "capacity must be positive in '{entry}'");
            Ok(NewRoom {
                room_number: number.to_string(),
                capacity,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_rooms;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_number_and_capacity() {
        let rooms = parse_rooms(&["A1:4".to_string(), "B2:2".to_string()]).unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].room_number, "A1");
        assert_eq!(rooms[0].capacity, 4);
    }

    #[test]
    fn rejects_zero_capacity() {
        assert!(parse_rooms(&["A1:0".to_string()]).is_err());
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(parse_rooms(&["A1".to_string()]).is_err());
    }
}
