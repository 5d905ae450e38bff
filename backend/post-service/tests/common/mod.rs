pub mod mock_user_lookup;
