use drive_types::FileEntry;
use humansize::{format_size, BINARY};
use progress_tracking::{ProgressSink, TransferEvent};

/// Renders transfer events to stderr, one line per chunk.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn update(&self, event: TransferEvent) {
        let percent = event.percent();
        match event {
            TransferEvent::InitiationStarted => eprintln!("Opening upload session..."),
            TransferEvent::InitiationComplete => eprintln!("Upload session open."),
            TransferEvent::InProgress { bytes, total } => match (total, percent) {
                (Some(total), Some(percent)) => eprintln!(
                    "{} / {} ({percent:.1}%)",
                    format_size(bytes, BINARY),
                    format_size(total, BINARY)
                ),
                _ => eprintln!("{} transferred", format_size(bytes, BINARY)),
            },
            TransferEvent::Complete { bytes } => {
                eprintln!("Done: {}", format_size(bytes, BINARY))
            },
        }
    }
}

/// One `list` line: mime, last modifying user, size, date, title.
pub fn format_list_entry(entry: &FileEntry) -> String {
    format!(
        "{:<29} {:<19} {:>12} {} {}",
        entry.mime_type.as_deref().unwrap_or("-"),
        entry.last_modifying_user_name.as_deref().unwrap_or("-"),
        entry.file_size.unwrap_or(0),
        entry.modified_date.as_deref().unwrap_or("-"),
        entry.title,
    )
}

/// One `md5` line in md5sum's binary-mode format.
pub fn format_md5_entry(entry: &FileEntry) -> String {
    format!(
        "{} *{}",
        entry.md5_checksum.as_deref().unwrap_or("-"),
        entry.title
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> FileEntry {
        FileEntry {
            id: "f1".into(),
            title: "backup.tar".into(),
            mime_type: Some("application/x-tar".into()),
            file_size: Some(26214400),
            md5_checksum: Some("9e107d9d372bb6826bd81d3542a419d6".into()),
            modified_date: Some("2014-05-01T12:00:00.000Z".into()),
            last_modifying_user_name: Some("martin".into()),
            download_url: None,
        }
    }

    #[test]
    fn list_line_is_columnar() {
        let line = format_list_entry(&entry());
        assert_eq!(
            line,
            "application/x-tar             martin                  26214400 2014-05-01T12:00:00.000Z backup.tar"
        );
    }

    #[test]
    fn md5_line_matches_md5sum_binary_format() {
        assert_eq!(
            format_md5_entry(&entry()),
            "9e107d9d372bb6826bd81d3542a419d6 *backup.tar"
        );
        let bare = FileEntry {
            md5_checksum: None,
            ..entry()
        };
        assert_eq!(format_md5_entry(&bare), "- *backup.tar");
    }
}
