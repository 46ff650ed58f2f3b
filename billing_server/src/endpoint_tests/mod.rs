mod helpers;
mod invoices;
mod mocks;
mod orders;
