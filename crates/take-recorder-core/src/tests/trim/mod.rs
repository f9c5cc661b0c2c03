mod editor;
