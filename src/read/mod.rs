mod ext;

pub use ext::ReadRecordExt;
