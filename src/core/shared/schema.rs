diesel::table! {
    images (id) {
        id -> Int4,
        file_name -> Varchar,
        number_of_people -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
