pub mod allotments;
pub mod claims;
pub mod documents;
pub mod tokens;
pub mod users;

pub mod prelude {
    pub use super::allotments::Entity as Allotments;
    pub use super::claims::Entity as Claims;
    pub use super::documents::Entity as Documents;
    pub use super::tokens::Entity as Tokens;
    pub use super::users::Entity as Users;
}
