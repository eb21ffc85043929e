mod file_dto;

pub use file_dto::{FileListQuery, FileResponseDto, ALLOWED_MIME_TYPES};
