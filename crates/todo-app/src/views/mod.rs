mod card;
pub use card::render_card;

mod form;
pub use form::{Form, FormFate};

mod list;
pub use list::ScrollContainer;

mod navbar;
pub use navbar::render_navbar;
