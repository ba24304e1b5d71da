pub mod http_image_fetcher;
