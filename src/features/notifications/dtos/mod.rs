mod notification_dto;

pub use notification_dto::{
    MarkAllReadDto, NotificationQueryParams, NotificationResponseDto, UnreadCountDto,
};
