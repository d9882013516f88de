diesel::table! {
    certificates (id) {
        id -> Uuid,
        user_name -> Varchar,
        user_email -> Varchar,
        playlist_id -> Varchar,
        playlist_title -> Varchar,
        channel_name -> Varchar,
        video_count -> Int4,
        total_duration_seconds -> Int8,
        video_list -> Array<Text>,
        created_at -> Timestamp,
    }
}
