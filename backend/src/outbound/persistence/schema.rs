//! Diesel table definitions mirroring `backend/migrations`.

diesel::table! {
    users (id) {
        id -> Int8,
        #[max_length = 100]
        name -> Varchar,
        #[max_length = 100]
        email -> Varchar,
        birth_date -> Nullable<Date>,
        #[max_length = 100]
        occupation -> Nullable<Varchar>,
        revision -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    tasks (id) {
        id -> Int8,
        #[max_length = 100]
        title -> Varchar,
        #[max_length = 500]
        description -> Nullable<Varchar>,
        #[max_length = 20]
        status -> Varchar,
        user_id -> Int8,
        started_at -> Nullable<Timestamptz>,
        finished_at -> Nullable<Timestamptz>,
        revision -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(tasks, users);
