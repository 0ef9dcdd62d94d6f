mod hashmap_user_account_store;

pub use hashmap_user_account_store::HashMapUserAccountStore;
