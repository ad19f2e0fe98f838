//! Diesel table definitions for the reservation schema.

diesel::table! {
    units (id) {
        id -> Int8,
        name -> Varchar,
        capacity -> Int4,
    }
}

diesel::table! {
    reservations (id) {
        id -> Int8,
        unit_id -> Int8,
        check_in -> Date,
        check_out -> Date,
        guest_name -> Varchar,
        party_size -> Int4,
    }
}

diesel::joinable!(reservations -> units (unit_id));

diesel::allow_tables_to_appear_in_same_query!(units, reservations);
